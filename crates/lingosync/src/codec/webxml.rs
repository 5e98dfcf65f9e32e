//! WebXML interchange documents.
//!
//! One document per remote file: a `<content>` root identifying the job and
//! its language pair, one `<JobItem>` element per item, and one child element
//! per translatable unit. The codec owns its writer value and exposes only
//! encode/decode/validate.

use std::collections::BTreeMap;

use chrono::Utc;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::model::{Job, JobItem, TranslatableUnit};
use crate::store::JobStore;

use super::{CodecError, Result, UNIT_KEY_DELIMITER};

/// Value of the root `tool-id` attribute.
pub const TOOL_ID: &str = "lingosync";

const ROOT_ELEMENT: &str = "content";
const ITEM_ELEMENT: &str = "JobItem";

const SOURCE_LANGUAGE_ATTR: &str = "source-language";
const TARGET_LANGUAGE_ATTR: &str = "target-language";
const JOB_ID_ATTR: &str = "job-id";

/// Encoder for job items. `wrap_cdata` selects verbatim CDATA bodies
/// (trimmed) over literal escaped text.
#[derive(Debug, Clone, Copy)]
pub struct WebXmlCodec {
    wrap_cdata: bool,
}

impl WebXmlCodec {
    pub fn new(wrap_cdata: bool) -> Self {
        Self { wrap_cdata }
    }

    pub fn for_job(job: &Job) -> Self {
        Self::new(job.wrap_cdata)
    }

    /// Serializes `items` into one interchange document for `job`.
    pub fn encode(&self, job: &Job, items: &[JobItem]) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        let write = |e| CodecError::Write(format!("{e}"));

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(write)?;

        let mut root = BytesStart::new(ROOT_ELEMENT);
        root.push_attribute((SOURCE_LANGUAGE_ATTR, job.source_language.as_str()));
        root.push_attribute((TARGET_LANGUAGE_ATTR, job.target_language.as_str()));
        root.push_attribute(("date", Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string().as_str()));
        root.push_attribute(("tool-id", TOOL_ID));
        root.push_attribute((JOB_ID_ATTR, job.id.to_string().as_str()));
        writer.write_event(Event::Start(root)).map_err(write)?;

        for item in items {
            let mut element = BytesStart::new(ITEM_ELEMENT);
            element.push_attribute(("id", item.id.to_string().as_str()));
            writer.write_event(Event::Start(element)).map_err(write)?;

            for unit in &item.units {
                self.write_unit(&mut writer, item, unit)?;
            }

            writer
                .write_event(Event::End(BytesEnd::new(ITEM_ELEMENT)))
                .map_err(write)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))
            .map_err(write)?;
        Ok(writer.into_inner())
    }

    fn write_unit(
        &self,
        writer: &mut Writer<Vec<u8>>,
        item: &JobItem,
        unit: &TranslatableUnit,
    ) -> Result<()> {
        let write = |e| CodecError::Write(format!("{e}"));
        let name = element_name(unit);
        let composite = format!("{}{}{}", item.id, UNIT_KEY_DELIMITER, unit.key);

        let mut element = BytesStart::new(name.as_str());
        element.push_attribute(("id", composite.as_str()));
        element.push_attribute(("resname", composite.as_str()));
        writer.write_event(Event::Start(element)).map_err(write)?;

        if self.wrap_cdata {
            for section in cdata_sections(unit.text.trim()) {
                writer
                    .write_event(Event::CData(BytesCData::new(section)))
                    .map_err(write)?;
            }
        } else {
            writer
                .write_event(Event::Text(BytesText::new(&unit.text)))
                .map_err(write)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new(name.as_str())))
            .map_err(write)?;
        Ok(())
    }
}

/// Derives a unit's element name: the label path (falling back to the raw
/// key) title-cased and stripped to `[A-Za-z0-9_-]`, with a guard prefix when
/// the result would not be a valid XML name start.
fn element_name(unit: &TranslatableUnit) -> String {
    let raw = if unit.label_path.is_empty() {
        unit.key.clone()
    } else {
        unit.label_path.concat()
    };

    let mut name = String::with_capacity(raw.len());
    let mut boundary = true;
    for c in raw.chars() {
        if c.is_whitespace() {
            boundary = true;
            continue;
        }
        let c = if boundary { c.to_ascii_uppercase() } else { c };
        boundary = false;
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            name.push(c);
        }
    }

    match name.chars().next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => name,
        _ => format!("Unit{name}"),
    }
}

/// Splits text into CDATA-safe sections: no section contains the `]]>`
/// terminator, and their concatenation reproduces the input.
fn cdata_sections(text: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find("]]>") {
        sections.push(format!("{}]]", &rest[..pos]));
        rest = &rest[pos + 2..];
    }
    sections.push(rest.to_string());
    sections
}

/// A parsed interchange document. Parsing happens exactly once at
/// construction; every accessor reads the cached result.
#[derive(Debug, Clone, Default)]
pub struct WebXmlDocument {
    source_language: Option<String>,
    target_language: Option<String>,
    job_id: Option<String>,
    units: BTreeMap<String, String>,
}

impl WebXmlDocument {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| CodecError::InvalidXml(format!("not UTF-8: {e}")))?;
        let mut reader = Reader::from_str(text);

        let mut document = Self::default();
        let mut depth = 0usize;
        let mut unit: Option<(String, String)> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    if depth == 0 {
                        document.read_root_attributes(&e)?;
                    } else if depth == 2 {
                        unit = Some((unit_id(&e)?, String::new()));
                    }
                    depth += 1;
                }
                Ok(Event::Empty(e)) => {
                    if depth == 2 {
                        document.units.insert(unit_id(&e)?, String::new());
                    }
                }
                Ok(Event::End(_)) => {
                    depth = depth.saturating_sub(1);
                    if depth == 2 {
                        if let Some((id, text)) = unit.take() {
                            document.units.insert(id, text);
                        }
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some((_, text)) = unit.as_mut() {
                        let decoded = e
                            .unescape()
                            .map_err(|e| CodecError::InvalidXml(e.to_string()))?;
                        text.push_str(&decoded);
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some((_, text)) = unit.as_mut() {
                        text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(CodecError::InvalidXml(e.to_string())),
            }
        }

        Ok(document)
    }

    fn read_root_attributes(&mut self, element: &BytesStart<'_>) -> Result<()> {
        for attribute in element.attributes() {
            let attribute = attribute.map_err(|e| CodecError::InvalidXml(e.to_string()))?;
            let value = attribute
                .unescape_value()
                .map_err(|e| CodecError::InvalidXml(e.to_string()))?
                .into_owned();
            match attribute.key.as_ref() {
                b"source-language" => self.source_language = Some(value),
                b"target-language" => self.target_language = Some(value),
                b"job-id" => self.job_id = Some(value),
                _ => {}
            }
        }
        Ok(())
    }

    pub fn source_language(&self) -> Option<&str> {
        self.source_language.as_deref()
    }

    pub fn target_language(&self) -> Option<&str> {
        self.target_language.as_deref()
    }

    /// The job id claimed by the document, when present and numeric.
    pub fn job_id(&self) -> Result<Option<u64>> {
        match self.job_id.as_deref() {
            None => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| CodecError::InvalidXml(format!("job-id '{raw}' is not numeric"))),
        }
    }

    /// Flat unit map: composite unit id -> text.
    pub fn units(&self) -> &BTreeMap<String, String> {
        &self.units
    }

    pub fn into_units(self) -> BTreeMap<String, String> {
        self.units
    }
}

fn unit_id(element: &BytesStart<'_>) -> Result<String> {
    for attribute in element.attributes() {
        let attribute = attribute.map_err(|e| CodecError::InvalidXml(e.to_string()))?;
        if attribute.key.as_ref() == b"id" {
            return Ok(attribute
                .unescape_value()
                .map_err(|e| CodecError::InvalidXml(e.to_string()))?
                .into_owned());
        }
    }
    Err(CodecError::InvalidXml(
        "translation unit without an 'id' attribute".to_string(),
    ))
}

/// Validates an inbound payload and resolves the job it claims to belong to.
/// The sole authority binding an inbound document to a local job: any missing
/// attribute, language mismatch, or empty body is a distinct failure.
pub async fn validate_import(
    document: &WebXmlDocument,
    jobs: &dyn JobStore,
) -> crate::error::Result<Job> {
    let job_id = document
        .job_id()?
        .ok_or(CodecError::MissingAttribute(JOB_ID_ATTR))?;
    let source = document
        .source_language()
        .ok_or(CodecError::MissingAttribute(SOURCE_LANGUAGE_ATTR))?;
    let target = document
        .target_language()
        .ok_or(CodecError::MissingAttribute(TARGET_LANGUAGE_ATTR))?;

    let job = jobs
        .job(job_id)
        .await?
        .ok_or(CodecError::UnknownJob(job_id))?;

    if job.source_language != source {
        return Err(CodecError::LanguageMismatch {
            attribute: SOURCE_LANGUAGE_ATTR,
            found: source.to_string(),
            expected: job.source_language.clone(),
        }
        .into());
    }
    if job.target_language != target {
        return Err(CodecError::LanguageMismatch {
            attribute: TARGET_LANGUAGE_ATTR,
            found: target.to_string(),
            expected: job.target_language.clone(),
        }
        .into());
    }
    if document.units().is_empty() {
        return Err(CodecError::EmptyDocument.into());
    }

    Ok(job)
}
