//! Support for .NET `.resx` resource files.
//!
//! Only string resources are handled: `<data>` elements carrying a `type` or
//! `mimetype` attribute (images, serialized objects, file references) are
//! kept out of imports. Written files carry the standard `resheader` block so
//! that ResXResourceReader accepts them.

use std::io::{BufRead, Write};

use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::{
    error::Error,
    formats::{attribute, read_text},
    state::DEFAULT_STATE,
    traits::Parser,
    types::ImportRecord,
};

const RESX_HEADERS: [(&str, &str); 4] = [
    ("resmimetype", "text/microsoft-resx"),
    ("version", "2.0"),
    (
        "reader",
        "System.Resources.ResXResourceReader, System.Windows.Forms, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089",
    ),
    (
        "writer",
        "System.Resources.ResXResourceWriter, System.Windows.Forms, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    pub data: Vec<DataEntry>,
}

/// One `<data>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataEntry {
    pub name: String,
    pub value: String,
    pub comment: Option<String>,
    /// `type` or `mimetype` attribute; set for non-string resources.
    pub type_name: Option<String>,
}

impl DataEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            comment: None,
            type_name: None,
        }
    }

    pub fn is_string(&self) -> bool {
        self.type_name.is_none()
    }
}

impl Format {
    /// Maps every string resource to an import record in `lang`.
    ///
    /// RESX carries no review state, so every record starts as `initial`.
    pub fn into_records(self, lang: &str) -> Vec<ImportRecord> {
        self.data
            .into_iter()
            .filter(DataEntry::is_string)
            .map(|d| {
                ImportRecord::new(d.name, lang, d.value, DEFAULT_STATE)
                    .with_comment(d.comment.filter(|c| !c.is_empty()))
            })
            .collect()
    }
}

impl Parser for Format {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);

        let mut buf = Vec::new();
        let mut data = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"data" => {
                    data.push(parse_data_entry(e, &mut xml_reader)?);
                }
                Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"data" => {
                    let (name, type_name) = data_attributes(e)?;
                    data.push(DataEntry {
                        type_name,
                        ..DataEntry::new(name, "")
                    });
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(Error::XmlParse(e)),
            }
            buf.clear();
        }
        Ok(Format { data })
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new_with_indent(&mut writer, b' ', 2);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml_writer.write_event(Event::Start(BytesStart::new("root")))?;

        for (name, value) in RESX_HEADERS {
            let mut header = BytesStart::new("resheader");
            header.push_attribute(("name", name));
            xml_writer.write_event(Event::Start(header))?;
            write_text_element(&mut xml_writer, "value", value)?;
            xml_writer.write_event(Event::End(BytesEnd::new("resheader")))?;
        }

        for entry in &self.data {
            let mut elem = BytesStart::new("data");
            elem.push_attribute(("name", entry.name.as_str()));
            if let Some(type_name) = &entry.type_name {
                elem.push_attribute(("type", type_name.as_str()));
            }
            elem.push_attribute(("xml:space", "preserve"));

            xml_writer.write_event(Event::Start(elem))?;
            write_text_element(&mut xml_writer, "value", &entry.value)?;
            if let Some(comment) = &entry.comment {
                write_text_element(&mut xml_writer, "comment", comment)?;
            }
            xml_writer.write_event(Event::End(BytesEnd::new("data")))?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new("root")))?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

fn write_text_element<W: Write>(
    xml_writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), Error> {
    xml_writer.write_event(Event::Start(BytesStart::new(name)))?;
    xml_writer.write_event(Event::Text(BytesText::new(text)))?;
    xml_writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn data_attributes(e: &BytesStart) -> Result<(String, Option<String>), Error> {
    let name = attribute(e, b"name")?
        .ok_or_else(|| Error::invalid_resource("data tag missing 'name'"))?;
    let type_name = match attribute(e, b"type")? {
        Some(t) => Some(t),
        None => attribute(e, b"mimetype")?,
    };
    Ok((name, type_name))
}

fn parse_data_entry<R: BufRead>(
    e: &BytesStart,
    xml_reader: &mut Reader<R>,
) -> Result<DataEntry, Error> {
    let (name, type_name) = data_attributes(e)?;
    let mut value = String::new();
    let mut comment = None;

    let mut buf = Vec::new();
    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"value" => value = read_text(xml_reader, b"value")?,
                b"comment" => comment = Some(read_text(xml_reader, b"comment")?),
                _ => {}
            },
            Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"comment" => {
                comment = Some(String::new());
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"data" => break,
            Ok(Event::Eof) => return Err(Error::invalid_resource("Unexpected EOF inside <data>")),
            Ok(_) => (),
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }

    Ok(DataEntry {
        name,
        value,
        comment,
        type_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const SAMPLE: &str = indoc! {r#"
        <?xml version="1.0" encoding="utf-8"?>
        <root>
          <resheader name="resmimetype">
            <value>text/microsoft-resx</value>
          </resheader>
          <data name="Greeting" xml:space="preserve">
            <value>Hello</value>
            <comment>Shown on the start page</comment>
          </data>
          <data name="Farewell" xml:space="preserve">
            <value>Good &amp; bye</value>
          </data>
          <data name="Empty" xml:space="preserve">
            <value />
          </data>
          <data name="Logo" type="System.Resources.ResXFileRef, System.Windows.Forms">
            <value>logo.png;System.Drawing.Bitmap</value>
          </data>
        </root>
    "#};

    #[test]
    fn test_parse_basic_resx() {
        let format = Format::from_str(SAMPLE).unwrap();
        assert_eq!(format.data.len(), 4);

        let greeting = &format.data[0];
        assert_eq!(greeting.name, "Greeting");
        assert_eq!(greeting.value, "Hello");
        assert_eq!(greeting.comment.as_deref(), Some("Shown on the start page"));

        assert_eq!(format.data[1].value, "Good & bye");
        assert_eq!(format.data[1].comment, None);
        assert_eq!(format.data[2].value, "");
        assert!(!format.data[3].is_string());
    }

    #[test]
    fn test_resheader_values_are_not_data() {
        let format = Format::from_str(SAMPLE).unwrap();
        assert!(format.data.iter().all(|d| d.value != "text/microsoft-resx"));
    }

    #[test]
    fn test_into_records_skips_non_string_resources() {
        let records = Format::from_str(SAMPLE).unwrap().into_records("en");
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["Greeting", "Farewell", "Empty"]);
        assert!(records.iter().all(|r| r.lang == "en" && r.state == "initial"));
        assert_eq!(
            records[0].comment.as_deref(),
            Some("Shown on the start page")
        );
        assert_eq!(records[1].comment, None);
    }

    #[test]
    fn test_missing_name_attribute() {
        let xml = r#"<root><data><value>x</value></data></root>"#;
        let err = Format::from_str(xml).unwrap_err();
        assert!(err.to_string().contains("missing 'name'"));
    }

    #[test]
    fn test_malformed_document() {
        let xml = r#"<root><data name="a"><value>x</comment></data></root>"#;
        let err = Format::from_str(xml).unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_written_file_reads_back() {
        let mut with_comment = DataEntry::new("b", "  padded <tag> ");
        with_comment.comment = Some("first\nsecond".to_string());
        let format = Format {
            data: vec![DataEntry::new("a", "A"), with_comment, DataEntry::new("c", "")],
        };

        let mut out = Vec::new();
        format.to_writer(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("<resheader name=\"resmimetype\">"));
        assert!(text.contains("xml:space=\"preserve\""));

        let reparsed = Format::from_str(&text).unwrap();
        assert_eq!(reparsed, format);
    }
}
