/// Fills `{key}` placeholders in a message template.
///
/// Placeholders without a bound variable are left untouched so a missing
/// binding is visible in the output instead of silently disappearing.
pub struct MessageBuilder {
    template: &'static str,
    vars: Vec<(&'static str, String)>,
}

impl MessageBuilder {
    pub fn new(template: &'static str) -> Self {
        Self {
            template,
            vars: Vec::new(),
        }
    }

    pub fn var(mut self, key: &'static str, value: impl ToString) -> Self {
        self.vars.push((key, value.to_string()));
        self
    }

    pub fn build(self) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) => {
                    let key = &after[..close];
                    match self.vars.iter().rev().find(|(k, _)| *k == key) {
                        Some((_, value)) => out.push_str(value),
                        None => {
                            out.push('{');
                            out.push_str(key);
                            out.push('}');
                        }
                    }
                    rest = &after[close + 1..];
                }
                None => {
                    out.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}
