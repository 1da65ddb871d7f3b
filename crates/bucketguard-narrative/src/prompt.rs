/// Aggregate facts handed to the model. Only counts and bucket names leave the process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NarrativeInput {
    pub subject: String,
    pub counts: Vec<(String, u64)>,
    pub buckets: Vec<String>,
}

impl NarrativeInput {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ..Self::default()
        }
    }

    pub fn count(mut self, label: impl Into<String>, value: u64) -> Self {
        self.counts.push((label.into(), value));
        self
    }

    pub fn bucket(mut self, name: impl Into<String>) -> Self {
        self.buckets.push(name.into());
        self
    }

    pub fn buckets<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.buckets.extend(names.into_iter().map(Into::into));
        self
    }
}

pub fn build_prompt(input: &NarrativeInput) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "You are an AWS security expert. Analyze this {} and provide a brief security assessment.\n\n",
        input.subject
    ));
    out.push_str("Results:\n");
    for (label, value) in &input.counts {
        out.push_str(&format!("- {label}: {value}\n"));
    }
    let names = if input.buckets.is_empty() {
        "None".to_string()
    } else {
        input.buckets.join(", ")
    };
    out.push_str(&format!("- Affected Bucket Names: {names}\n\n"));
    out.push_str("Provide a 2-3 sentence analysis:\n");
    out.push_str("1. What is the security risk of the affected buckets?\n");
    out.push_str("2. Which configuration should be enabled?\n");
    out.push_str("3. What action should the user take immediately?\n\n");
    out.push_str("Be concise and actionable.");
    out
}
