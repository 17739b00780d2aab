use serde::Serialize;

/// Structured result card sent to a channel.
/// Serializes to the shape chat platforms expect for rich embeds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Embed {
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub color: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

/// One named section of an embed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl Embed {
    pub fn new<T>(title: T, color: u32) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            color,
            ..Self::default()
        }
    }
    pub fn description<D>(mut self, description: D) -> Self
    where
        D: Into<String>,
    {
        self.description = description.into();
        self
    }
    pub fn field<N, V>(mut self, name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.fields.push(Field {
            name: name.into(),
            value: value.into(),
            inline: false,
        });
        self
    }
    pub fn footer<F>(mut self, footer: F) -> Self
    where
        F: Into<String>,
    {
        self.footer = Some(footer.into());
        self
    }
    /// Looks up a field value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Shortens `s` to at most `n` characters, marking the cut.
pub fn truncate(s: &str, n: usize) -> String {
    const MARK: &str = " [...]";
    let count = s.chars().count();
    if count > n && n >= MARK.len() {
        s.chars()
            .take(n - MARK.len())
            .chain(MARK.chars())
            .collect()
    } else {
        s.to_string()
    }
}
