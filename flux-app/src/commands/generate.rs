use anyhow::Result;
use colored::Colorize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

use flux_config::AppConfig;
use flux_generator::{generate_flux_structure, GenerationReport};
use flux_messages::{msg, MESSAGES};
use flux_plugin::Registry;

use super::interactive::collect_app_config;
use crate::kubectl;
use crate::terminal::DialoguerPrompter;

/// Generate from a config file, or from interactive answers when none is given.
pub fn handle_generate(config_path: Option<&Path>, output: &Path, no_cluster: bool) -> Result<()> {
    let (config, registry) = match config_path {
        Some(path) => {
            let config = AppConfig::load(path)?;
            println!(
                "{}",
                msg!(MESSAGES.common.config_loaded, path = path.display())
            );
            (config, Registry::new(None))
        }
        None => {
            let lister = kubectl::connect(no_cluster);
            let registry = Registry::new(lister.clone());
            let mut prompter = DialoguerPrompter::new();
            let config = collect_app_config(&mut prompter, &registry, lister.as_deref())?;
            (config, registry)
        }
    };

    println!(
        "{}",
        msg!(
            MESSAGES.generator.starting,
            app = &config.app_name,
            namespace = &config.namespace
        )
    );
    let report = generate_flux_structure(&config, &registry, output)?;
    debug!(files = report.files.len(), "Generation finished");

    print_report(&config, &report);
    Ok(())
}

fn print_report(config: &AppConfig, report: &GenerationReport) {
    println!(
        "{}",
        msg!(
            MESSAGES.generator.success,
            app = &config.app_name,
            namespace = &config.namespace
        )
        .green()
    );

    let plugin_files: HashSet<&PathBuf> = report
        .plugin_outputs
        .iter()
        .flat_map(|output| &output.files)
        .collect();

    println!(
        "{}",
        msg!(MESSAGES.generator.files_created, dir = report.app_dir.display())
    );
    for path in report.files.iter().filter(|p| !plugin_files.contains(p)) {
        println!("{}", msg!(MESSAGES.generator.file_entry, path = path.display()));
    }

    if report.plugin_file_count() > 0 {
        println!(
            "{}",
            msg!(
                MESSAGES.generator.plugin_files_header,
                count = report.plugin_file_count()
            )
        );
        for output in &report.plugin_outputs {
            for path in &output.files {
                println!(
                    "{}",
                    msg!(
                        MESSAGES.generator.plugin_file_entry,
                        plugin = &output.plugin,
                        path = path.display()
                    )
                );
            }
        }
    }

    println!("{}", MESSAGES.generator.summary_header.bold());
    println!("{}", msg!(MESSAGES.generator.summary_app, app = &config.app_name));
    println!(
        "{}",
        msg!(MESSAGES.generator.summary_namespace, namespace = &config.namespace)
    );
    println!(
        "{}",
        msg!(
            MESSAGES.generator.summary_chart,
            chart = &config.chart_name,
            version = &config.chart_version
        )
    );
    println!(
        "{}",
        msg!(MESSAGES.generator.summary_interval, interval = &config.interval)
    );
    println!(
        "{}",
        msg!(
            MESSAGES.generator.summary_plugins,
            count = report.plugin_outputs.len()
        )
    );
    for (index, output) in report.plugin_outputs.iter().enumerate() {
        println!(
            "{}",
            msg!(
                MESSAGES.generator.summary_plugin_entry,
                index = index + 1,
                plugin = &output.plugin,
                label = &output.label
            )
        );
    }

    println!(
        "{}",
        msg!(MESSAGES.generator.next_steps, dir = report.app_dir.display())
    );
}
