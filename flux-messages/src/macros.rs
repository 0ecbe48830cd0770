/// Build a message from a template and `key = value` bindings.
///
/// ```
/// use flux_messages::{msg, MESSAGES};
///
/// let line = msg!(MESSAGES.plugin.instance_added, plugin = "externalsecret", label = "vault");
/// assert!(line.contains("vault"));
/// ```
#[macro_export]
macro_rules! msg {
    ($template:expr) => {
        $crate::builder::MessageBuilder::new($template).build()
    };
    ($template:expr, $($key:ident = $value:expr),+ $(,)?) => {
        {
            let mut builder = $crate::builder::MessageBuilder::new($template);
            $(
                builder = builder.var(stringify!($key), $value);
            )+
            builder.build()
        }
    };
}
