use anyhow::Result;

use flux_messages::{msg, MESSAGES};
use flux_plugin::{Registry, Variable};

pub fn handle_plugins() -> Result<()> {
    let registry = Registry::new(None);

    println!("{}", MESSAGES.plugin.list_header);
    for plugin in registry.list() {
        println!(
            "{}",
            msg!(
                MESSAGES.plugin.list_entry,
                name = plugin.name(),
                description = plugin.description()
            )
        );
        for variable in plugin.variables() {
            println!("{}", variable_line(variable));
        }
    }
    Ok(())
}

fn variable_line(variable: &Variable) -> String {
    msg!(
        MESSAGES.plugin.list_variable,
        name = &variable.name,
        kind = variable.kind.as_str(),
        required = if variable.required { ", required" } else { "" },
        description = &variable.description
    )
}
