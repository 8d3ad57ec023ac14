//! Read support for XLIFF 1.2 interchange files.
//!
//! Each `<trans-unit>` (at any depth, so units inside `<group>` are found)
//! becomes one import record. Writing XLIFF is not supported.

use std::io::{BufRead, Write};

use log::warn;
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use crate::{
    error::Error,
    formats::{attribute, read_text},
    state::DEFAULT_STATE,
    traits::Parser,
    types::ImportRecord,
};

/// Placeholder id emitted by some tools; the unit's `resname` identifies it instead.
const PLACEHOLDER_ID: &str = "none";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    /// `target-language` of the first `<file>` element, if declared.
    pub target_language: Option<String>,
    pub units: Vec<TransUnit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransUnit {
    pub id: Option<String>,
    pub resname: Option<String>,
    pub source: String,
    pub target: Option<String>,
    /// `state` attribute of `<target>`.
    pub state: Option<String>,
    /// Text of the first `<note>`; later notes are ignored.
    pub note: Option<String>,
}

impl TransUnit {
    /// The id under which this unit is merged.
    pub fn resolved_id(&self) -> Result<&str, Error> {
        match self.id.as_deref() {
            Some(id) if id != PLACEHOLDER_ID && !id.is_empty() => Ok(id),
            _ => self
                .resname
                .as_deref()
                .filter(|r| !r.is_empty())
                .ok_or_else(|| {
                    Error::invalid_resource(format!(
                        "trans-unit with id {:?} has no usable resname",
                        self.id.as_deref().unwrap_or("")
                    ))
                }),
        }
    }

    fn into_record(self, lang: &str) -> Result<ImportRecord, Error> {
        let id = self.resolved_id()?.to_string();
        Ok(ImportRecord::new(
            id,
            lang,
            self.target.unwrap_or_default(),
            self.state.unwrap_or_else(|| DEFAULT_STATE.to_string()),
        )
        .with_comment(self.note.filter(|n| !n.is_empty())))
    }
}

impl Format {
    /// Maps every unit to an import record in `lang`.
    ///
    /// A unit without `<target>` becomes an empty `initial` record, which
    /// overwrites whatever the database already holds for that id and
    /// language when merged.
    ///
    /// Fails on the first unit without a usable id, before any record is
    /// handed to the merge engine.
    pub fn into_records(self, lang: &str) -> Result<Vec<ImportRecord>, Error> {
        if let Some(declared) = &self.target_language
            && declared != lang
        {
            warn!(
                "XLIFF declares target-language {} but is imported as {}",
                declared, lang
            );
        }
        self.units
            .into_iter()
            .map(|unit| unit.into_record(lang))
            .collect()
    }
}

impl Parser for Format {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);

        let mut buf = Vec::new();
        let mut format = Format::default();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"file" => {
                    if format.target_language.is_none() {
                        format.target_language = attribute(e, b"target-language")?;
                    }
                }
                Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"trans-unit" => {
                    format.units.push(parse_trans_unit(e, &mut xml_reader)?);
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(Error::XmlParse(e)),
            }
            buf.clear();
        }
        Ok(format)
    }

    fn to_writer<W: Write>(&self, _writer: W) -> Result<(), Error> {
        Err(Error::NotImplemented(
            "exporting XLIFF files is not supported".to_string(),
        ))
    }
}

fn parse_trans_unit<R: BufRead>(
    e: &BytesStart,
    xml_reader: &mut Reader<R>,
) -> Result<TransUnit, Error> {
    let mut unit = TransUnit {
        id: attribute(e, b"id")?,
        resname: attribute(e, b"resname")?,
        ..TransUnit::default()
    };

    let mut buf = Vec::new();
    let mut skip_buf = Vec::new();
    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"source" => unit.source = read_text(xml_reader, b"source")?,
                b"target" => {
                    unit.state = attribute(e, b"state")?;
                    unit.target = Some(read_text(xml_reader, b"target")?);
                }
                b"note" => {
                    let note = read_text(xml_reader, b"note")?;
                    if unit.note.is_none() {
                        unit.note = Some(note);
                    }
                }
                // Nested blocks such as alt-trans carry their own target and note.
                _ => {
                    xml_reader.read_to_end_into(e.name(), &mut skip_buf)?;
                    skip_buf.clear();
                }
            },
            Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"target" => {
                unit.state = attribute(e, b"state")?;
                unit.target = Some(String::new());
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"trans-unit" => break,
            Ok(Event::Eof) => {
                return Err(Error::invalid_resource("Unexpected EOF inside <trans-unit>"));
            }
            Ok(_) => (),
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }
    Ok(unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const SAMPLE: &str = indoc! {r#"
        <?xml version="1.0" encoding="utf-8"?>
        <xliff version="1.2" xmlns="urn:oasis:names:tc:xliff:document:1.2">
          <file datatype="xml" source-language="en" target-language="de" original="Strings.resx">
            <body>
              <group id="Strings">
                <trans-unit id="Greeting">
                  <source>Hello</source>
                  <target state="translated">Hallo</target>
                  <note>Start page</note>
                  <note>Second note</note>
                </trans-unit>
                <trans-unit id="none" resname="Farewell">
                  <source>Bye</source>
                  <target state="signed-off">Tschüss</target>
                </trans-unit>
                <trans-unit id="Pending">
                  <source>Later</source>
                </trans-unit>
              </group>
            </body>
          </file>
        </xliff>
    "#};

    #[test]
    fn test_parse_units() {
        let format = Format::from_str(SAMPLE).unwrap();
        assert_eq!(format.target_language.as_deref(), Some("de"));
        assert_eq!(format.units.len(), 3);

        let greeting = &format.units[0];
        assert_eq!(greeting.source, "Hello");
        assert_eq!(greeting.target.as_deref(), Some("Hallo"));
        assert_eq!(greeting.state.as_deref(), Some("translated"));
        assert_eq!(greeting.note.as_deref(), Some("Start page"));
    }

    #[test]
    fn test_placeholder_id_uses_resname() {
        let format = Format::from_str(SAMPLE).unwrap();
        assert_eq!(format.units[1].resolved_id().unwrap(), "Farewell");
        assert_eq!(format.units[0].resolved_id().unwrap(), "Greeting");
    }

    #[test]
    fn test_into_records() {
        let records = Format::from_str(SAMPLE).unwrap().into_records("de").unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].id, "Greeting");
        assert_eq!(records[0].comment.as_deref(), Some("Start page"));

        // Unrecognized states pass through untouched.
        assert_eq!(records[1].id, "Farewell");
        assert_eq!(records[1].state, "signed-off");
        assert_eq!(records[1].text, "Tschüss");

        // No target: empty text in the default state.
        assert_eq!(records[2].text, "");
        assert_eq!(records[2].state, "initial");
        assert_eq!(records[2].comment, None);
    }

    #[test]
    fn test_placeholder_without_resname_fails() {
        let xml = r#"<xliff><file><body><trans-unit id="none"><source>x</source></trans-unit></body></file></xliff>"#;
        let err = Format::from_str(xml).unwrap().into_records("en").unwrap_err();
        assert!(matches!(err, Error::InvalidResource(_)));
    }

    #[test]
    fn test_malformed_document() {
        let xml = r#"<xliff><file><body><trans-unit id="a"><target>x</source></trans-unit>"#;
        assert!(Format::from_str(xml).unwrap_err().is_parse_error());
    }

    #[test]
    fn test_empty_target_element() {
        let xml = r#"<xliff><file><body><trans-unit id="a"><target state="final"/></trans-unit></body></file></xliff>"#;
        let unit = &Format::from_str(xml).unwrap().units[0];
        assert_eq!(unit.target.as_deref(), Some(""));
        assert_eq!(unit.state.as_deref(), Some("final"));
    }

    #[test]
    fn test_alt_trans_does_not_replace_target() {
        let xml = indoc! {r#"
            <xliff version="1.2">
              <file target-language="de">
                <body>
                  <trans-unit id="Greeting">
                    <source>Hello</source>
                    <target state="final">Hallo</target>
                    <alt-trans match-quality="80">
                      <source>Hello</source>
                      <target state="needs-review-translation">Servus MT</target>
                      <note>machine suggestion</note>
                    </alt-trans>
                  </trans-unit>
                  <trans-unit id="Farewell">
                    <source>Bye</source>
                    <alt-trans>
                      <target state="translated"/>
                    </alt-trans>
                  </trans-unit>
                </body>
              </file>
            </xliff>
        "#};

        let records = Format::from_str(xml).unwrap().into_records("de").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "Hallo");
        assert_eq!(records[0].state, "final");
        assert_eq!(records[0].comment, None);
        assert_eq!(records[1].id, "Farewell");
        assert_eq!(records[1].text, "");
        assert_eq!(records[1].state, DEFAULT_STATE);
    }

    #[test]
    fn test_writing_is_not_implemented() {
        let mut out = Vec::new();
        let err = Format::default().to_writer(&mut out).unwrap_err();
        assert!(matches!(err, Error::NotImplemented(_)));
        assert!(out.is_empty());
    }
}
