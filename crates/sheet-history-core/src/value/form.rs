//! Forms and uploaded files, the structured payloads of save tokens.

use std::{fmt, str::FromStr};

use base64::{Engine as _, engine::general_purpose::URL_SAFE};
use serde::{Deserialize, Serialize};

use crate::{error::ValueError, name::FormName, reference::CellRef, value::scalar::ValueType};

/// One input of a [`Form`], bound to a cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormField {
    reference: String,
    label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value_type: Option<ValueType>,
}

impl FormField {
    pub fn new(
        reference: CellRef,
        label: impl Into<String>,
        value_type: Option<ValueType>,
    ) -> Self {
        Self {
            reference: reference.to_string(),
            label: label.into(),
            value_type,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value_type(&self) -> Option<ValueType> {
        self.value_type
    }
}

/// A named form, exchanged in fragments as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Form {
    name: FormName,
    #[serde(default)]
    fields: Vec<FormField>,
}

impl Form {
    pub fn new(name: FormName, fields: Vec<FormField>) -> Self {
        Self { name, fields }
    }

    pub fn name(&self) -> &FormName {
        &self.name
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }
}

impl FromStr for Form {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let form: Self = serde_json::from_str(s).map_err(|err| ValueError::Json {
            kind: "form",
            message: err.to_string(),
        })?;
        for field in &form.fields {
            field.reference.parse::<CellRef>()?;
        }
        Ok(form)
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// A file chosen in the browser for upload, rendered `<name>/<base64>`.
///
/// The content uses the URL-safe base64 alphabet so it never contains `/`,
/// and the name is split off at the last `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BrowserFile {
    name: String,
    content: Vec<u8>,
}

impl BrowserFile {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Result<Self, ValueError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValueError::Empty("file name"));
        }
        if name.chars().any(char::is_control) {
            return Err(ValueError::invalid("file name", name));
        }
        Ok(Self { name, content })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

impl FromStr for BrowserFile {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, encoded) = s
            .rsplit_once('/')
            .ok_or_else(|| ValueError::invalid("browser file", s))?;
        let content = URL_SAFE
            .decode(encoded)
            .map_err(|err| ValueError::Base64(err.to_string()))?;
        Self::new(name, content)
    }
}

impl fmt::Display for BrowserFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, URL_SAFE.encode(&self.content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_json() {
        let name = FormName::new("Contact").unwrap();
        let form = Form::new(
            name.clone(),
            vec![FormField::new(
                "B2".parse().unwrap(),
                "Email",
                Some(ValueType::Text),
            )],
        );
        let json = form.to_string();
        assert_eq!(
            json,
            r#"{"name":"Contact","fields":[{"reference":"B2","label":"Email","value_type":"text"}]}"#
        );
        assert_eq!(json.parse::<Form>().unwrap(), form);
        assert_eq!(r#"{"name":"Contact"}"#.parse::<Form>().unwrap().name(), &name);
    }

    #[test]
    fn test_form_rejects_bad_input() {
        assert!(r#"{"name":"1bad"}"#.parse::<Form>().is_err());
        assert!(
            r#"{"name":"F","fields":[{"reference":"not-a-cell","label":"x"}]}"#
                .parse::<Form>()
                .is_err()
        );
        assert!("not json".parse::<Form>().is_err());
    }

    #[test]
    fn test_browser_file() {
        let file = BrowserFile::new("notes.txt", b"hello?world".to_vec()).unwrap();
        let text = file.to_string();
        assert_eq!(text, "notes.txt/aGVsbG8_d29ybGQ=");
        assert_eq!(text.parse::<BrowserFile>().unwrap(), file);
    }

    #[test]
    fn test_browser_file_invalid() {
        assert!("no-separator".parse::<BrowserFile>().is_err());
        assert!("name/not base64!".parse::<BrowserFile>().is_err());
        assert!("/aGVsbG8=".parse::<BrowserFile>().is_err());
    }
}
