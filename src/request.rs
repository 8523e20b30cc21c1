//! The generation request builder and the wire payload it produces.
//!
//! Setters validate their own argument immediately. Whether the required fields
//! (`inputText`, `textMode`, `format`) were supplied is only checked by
//! [`GenerationRequest::build`], so setters may be called in any order.
//!
//! # Examples
//!
//! ```
//! use gamma_sdk::{CardSplit, Format, GenerationRequest, Language, OptionMap, TextMode};
//!
//! # fn main() -> Result<(), gamma_sdk::Error> {
//! let payload = GenerationRequest::new()
//!     .input_text("Hello world")?
//!     .format(Format::Presentation)
//!     .text_mode(TextMode::Generate)
//!     .num_cards(10)?
//!     .card_split(CardSplit::Auto)
//!     .text_options(OptionMap::new().with("language", Language::Ru).with("tone", "friendly"))?
//!     .export_as("pdf")?
//!     .build()?;
//!
//! let json = payload.to_value()?;
//! assert_eq!(json["format"], "presentation");
//! assert_eq!(json["textOptions"]["language"], "ru");
//! assert!(json.get("themeName").is_none());
//! # Ok(())
//! # }
//! ```

use crate::catalog::wire_enum;
use crate::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};

wire_enum! {
    /// How the input text is turned into content.
    pub enum TextMode {
        Generate => "generate",
        Condense => "condense",
        Preserve => "preserve",
    }
}

wire_enum! {
    /// The kind of artifact to generate.
    pub enum Format {
        Presentation => "presentation",
        Document => "document",
        Social => "social",
    }
}

wire_enum! {
    /// How the input is split into cards.
    pub enum CardSplit {
        Auto => "auto",
        InputTextBreaks => "inputTextBreaks",
    }
}

wire_enum! {
    /// Additional export file type.
    pub enum ExportFormat {
        Pdf => "pdf",
        Pptx => "pptx",
    }
}

wire_enum! {
    /// Card aspect ratio (`cardOptions.dimensions`).
    pub enum CardDimensions {
        Wide => "16x9",
        Standard => "4x3",
        Fluid => "fluid",
    }
}

/// An open-ended option bag (`textOptions`, `imageOptions`, ...).
///
/// Keys are passed through untouched. Values are anything that converts into
/// JSON, including the enums in this crate, which become their wire strings.
/// Inserting `null` removes the key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OptionMap(Map<String, Value>);

impl OptionMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry and returns the map, for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds or replaces an entry. A `null` value removes the key instead.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        match value.into() {
            Value::Null => {
                self.0.remove(&key);
            }
            value => {
                self.0.insert(key, value);
            }
        }
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns `true` if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Map<String, Value>> for OptionMap {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for OptionMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OptionMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// Builder for a generation request.
///
/// Converted once, by [`build`](Self::build), into an immutable [`GenerationPayload`].
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    input_text: Option<String>,
    text_mode: Option<TextMode>,
    format: Option<Format>,
    theme_name: Option<String>,
    num_cards: Option<u32>,
    card_split: Option<CardSplit>,
    additional_instructions: Option<String>,
    export_as: Option<ExportFormat>,
    text_options: OptionMap,
    image_options: OptionMap,
    card_options: OptionMap,
    sharing_options: OptionMap,
    metadata: OptionMap,
    tags: Vec<String>,
}

impl GenerationRequest {
    /// Creates an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source text. Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the text is empty after trimming.
    pub fn input_text(mut self, input_text: impl AsRef<str>) -> Result<Self> {
        let input_text = input_text.as_ref().trim();
        if input_text.is_empty() {
            return Err(Error::Validation("Input text must not be empty.".to_string()));
        }

        self.input_text = Some(input_text.to_string());
        Ok(self)
    }

    /// Sets the text mode.
    pub fn text_mode(mut self, text_mode: TextMode) -> Self {
        self.text_mode = Some(text_mode);
        self
    }

    /// Sets the output format.
    pub fn format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Sets the theme by name. Blank names are omitted from the payload.
    pub fn theme_name(mut self, theme_name: impl AsRef<str>) -> Self {
        self.theme_name = non_blank(theme_name.as_ref());
        self
    }

    /// Sets the number of cards to generate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `num_cards` is zero.
    pub fn num_cards(mut self, num_cards: u32) -> Result<Self> {
        if num_cards == 0 {
            return Err(Error::Validation(
                "Number of cards must be positive.".to_string(),
            ));
        }

        self.num_cards = Some(num_cards);
        Ok(self)
    }

    /// Sets how the input is split into cards.
    pub fn card_split(mut self, card_split: CardSplit) -> Self {
        self.card_split = Some(card_split);
        self
    }

    /// Sets free-form extra instructions. Blank text is omitted from the payload.
    pub fn additional_instructions(mut self, instructions: impl AsRef<str>) -> Self {
        self.additional_instructions = non_blank(instructions.as_ref());
        self
    }

    /// Requests an additional export, `"pdf"` or `"pptx"` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for any other export type.
    pub fn export_as(mut self, export_as: impl AsRef<str>) -> Result<Self> {
        let normalized = export_as.as_ref().trim().to_ascii_lowercase();
        let export = normalized
            .parse::<ExportFormat>()
            .map_err(|_| Error::Validation("Export type must be pdf or pptx.".to_string()))?;

        self.export_as = Some(export);
        Ok(self)
    }

    /// Sets text options. `language`, if present, must be a string or a
    /// [`Language`](crate::Language).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `language` is not a string.
    pub fn text_options(mut self, options: OptionMap) -> Result<Self> {
        require_string(&options, "language", "Text options language")?;
        self.text_options = options;
        Ok(self)
    }

    /// Sets image options. `model`, if present, must be a string or an
    /// [`ImageModel`](crate::ImageModel).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `model` is not a string.
    pub fn image_options(mut self, options: OptionMap) -> Result<Self> {
        require_string(&options, "model", "Image model")?;
        self.image_options = options;
        Ok(self)
    }

    /// Sets card options. `dimensions`, if present, must be one of
    /// `16x9`, `4x3` or `fluid`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for any other dimensions value.
    pub fn card_options(mut self, options: OptionMap) -> Result<Self> {
        if let Some(dimensions) = options.get("dimensions") {
            let known = dimensions
                .as_str()
                .is_some_and(|d| d.parse::<CardDimensions>().is_ok());
            if !known {
                return Err(Error::Validation(
                    "Card dimensions must be one of 16x9, 4x3, fluid.".to_string(),
                ));
            }
        }

        self.card_options = options;
        Ok(self)
    }

    /// Sets sharing options. Passed through as-is.
    pub fn sharing_options(mut self, options: OptionMap) -> Self {
        self.sharing_options = options;
        self
    }

    /// Sets caller metadata. Passed through as-is.
    pub fn metadata(mut self, metadata: OptionMap) -> Self {
        self.metadata = metadata;
        self
    }

    /// Sets the tags, keeping their order.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Checks the required fields and produces the wire payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first missing required field.
    pub fn build(self) -> Result<GenerationPayload> {
        let input_text = self
            .input_text
            .ok_or_else(|| Error::Validation("Input text is required.".to_string()))?;
        let text_mode = self
            .text_mode
            .ok_or_else(|| Error::Validation("Text mode is required.".to_string()))?;
        let format = self
            .format
            .ok_or_else(|| Error::Validation("Format is required.".to_string()))?;

        Ok(GenerationPayload {
            input_text,
            text_mode,
            format,
            theme_name: self.theme_name,
            num_cards: self.num_cards,
            card_split: self.card_split,
            additional_instructions: self.additional_instructions,
            export_as: self.export_as,
            text_options: self.text_options,
            image_options: self.image_options,
            card_options: self.card_options,
            sharing_options: self.sharing_options,
            metadata: self.metadata,
            tags: self.tags,
        })
    }
}

/// The validated body of `POST /generations`.
///
/// Serializes in field order and leaves out every unset or empty field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationPayload {
    pub input_text: String,
    pub text_mode: TextMode,
    pub format: Format,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_cards: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_split: Option<CardSplit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_as: Option<ExportFormat>,
    #[serde(skip_serializing_if = "OptionMap::is_empty")]
    pub text_options: OptionMap,
    #[serde(skip_serializing_if = "OptionMap::is_empty")]
    pub image_options: OptionMap,
    #[serde(skip_serializing_if = "OptionMap::is_empty")]
    pub card_options: OptionMap,
    #[serde(skip_serializing_if = "OptionMap::is_empty")]
    pub sharing_options: OptionMap,
    #[serde(skip_serializing_if = "OptionMap::is_empty")]
    pub metadata: OptionMap,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl GenerationPayload {
    /// Renders the payload as a JSON value.
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| Error::SerializationFailed(e.to_string()))
    }

    /// Renders the payload as a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::SerializationFailed(e.to_string()))
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn require_string(options: &OptionMap, key: &str, label: &str) -> Result<()> {
    match options.get(key) {
        Some(value) if !value.is_string() => Err(Error::Validation(format!(
            "{} must be a string or a known enum value.",
            label
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ImageModel, Language};
    use serde_json::json;

    fn minimal() -> GenerationRequest {
        GenerationRequest::new()
            .input_text("Hello")
            .unwrap()
            .format(Format::Document)
            .text_mode(TextMode::Preserve)
    }

    fn assert_no_empty_values(value: &Value) {
        for (key, v) in value.as_object().unwrap() {
            match v {
                Value::Null => panic!("{} is null", key),
                Value::Array(a) => assert!(!a.is_empty(), "{} is empty", key),
                Value::Object(o) => assert!(!o.is_empty(), "{} is empty", key),
                Value::String(s) => assert!(!s.is_empty(), "{} is empty", key),
                _ => {}
            }
        }
    }

    #[test]
    fn test_payload_normalises_enums() {
        let payload = GenerationRequest::new()
            .input_text("Hello world")
            .unwrap()
            .format(Format::Presentation)
            .text_mode(TextMode::Generate)
            .num_cards(10)
            .unwrap()
            .card_split(CardSplit::Auto)
            .text_options(
                OptionMap::new()
                    .with("language", Language::Ru)
                    .with("tone", "friendly"),
            )
            .unwrap()
            .image_options(
                OptionMap::new()
                    .with("model", ImageModel::Imagen4Pro)
                    .with("style", "photorealistic"),
            )
            .unwrap()
            .export_as("pdf")
            .unwrap()
            .build()
            .unwrap();

        let value = payload.to_value().unwrap();
        assert_eq!(
            value,
            json!({
                "inputText": "Hello world",
                "textMode": "generate",
                "format": "presentation",
                "numCards": 10,
                "cardSplit": "auto",
                "exportAs": "pdf",
                "textOptions": {"language": "ru", "tone": "friendly"},
                "imageOptions": {"model": "imagen-4-pro", "style": "photorealistic"},
            })
        );
        assert_no_empty_values(&value);
    }

    #[test]
    fn test_payload_key_order() {
        let json = minimal()
            .tags(["a", "b"])
            .theme_name("Oasis")
            .build()
            .unwrap()
            .to_json()
            .unwrap();
        assert_eq!(
            json,
            r#"{"inputText":"Hello","textMode":"preserve","format":"document","themeName":"Oasis","tags":["a","b"]}"#
        );
    }

    #[test]
    fn test_minimal_payload_omits_optional_fields() {
        let value = minimal().build().unwrap().to_value().unwrap();
        assert_eq!(value.as_object().unwrap().len(), 3);
        assert_no_empty_values(&value);
    }

    #[test]
    fn test_blank_optional_strings_are_omitted() {
        let value = minimal()
            .theme_name("   ")
            .additional_instructions("")
            .sharing_options(OptionMap::new())
            .tags(Vec::<String>::new())
            .build()
            .unwrap()
            .to_value()
            .unwrap();
        assert_no_empty_values(&value);
        assert!(value.get("themeName").is_none());
        assert!(value.get("additionalInstructions").is_none());
    }

    #[test]
    fn test_missing_required_fields_in_any_order() {
        let err = GenerationRequest::new().build().unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m.contains("Input text")));

        let err = GenerationRequest::new()
            .format(Format::Social)
            .input_text("x")
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m.contains("Text mode")));

        let err = GenerationRequest::new()
            .text_mode(TextMode::Condense)
            .input_text("x")
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m.contains("Format")));

        assert!(GenerationRequest::new()
            .format(Format::Social)
            .text_mode(TextMode::Condense)
            .input_text("x")
            .unwrap()
            .build()
            .is_ok());
    }

    #[test]
    fn test_setter_validation() {
        assert!(matches!(
            GenerationRequest::new().input_text("  \n "),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            GenerationRequest::new().num_cards(0),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            GenerationRequest::new().export_as("docx"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            GenerationRequest::new().card_options(OptionMap::new().with("dimensions", "1x1")),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            GenerationRequest::new().text_options(OptionMap::new().with("language", 7)),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            GenerationRequest::new().image_options(OptionMap::new().with("model", true)),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_export_as_is_case_insensitive() {
        let payload = minimal().export_as(" PPTX ").unwrap().build().unwrap();
        assert_eq!(payload.export_as, Some(ExportFormat::Pptx));
    }

    #[test]
    fn test_unknown_option_strings_pass_through() {
        let payload = minimal()
            .text_options(OptionMap::new().with("language", "tlh"))
            .unwrap()
            .image_options(OptionMap::new().with("model", "next-gen-model"))
            .unwrap()
            .card_options(OptionMap::new().with("dimensions", CardDimensions::Fluid))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(payload.text_options.get("language"), Some(&json!("tlh")));
        assert_eq!(payload.image_options.get("model"), Some(&json!("next-gen-model")));
        assert_eq!(payload.card_options.get("dimensions"), Some(&json!("fluid")));
    }

    #[test]
    fn test_option_map_null_removes_key() {
        let map = OptionMap::new().with("tone", "calm").with("tone", Value::Null);
        assert!(map.is_empty());
    }
}
