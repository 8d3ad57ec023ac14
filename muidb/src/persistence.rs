//! Load and save of the canonical `.muidb` store.
//!
//! The store is an XML document:
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <muidb version="1">
//!   <items>
//!     <item id="Greeting">
//!       <comment>Shown on the start page</comment>
//!       <text lang="en" state="final">Hello</text>
//!     </item>
//!   </items>
//!   <files>
//!     <file name="Strings.resx" lang="en"/>
//!   </files>
//! </muidb>
//! ```
//!
//! Items are written in id order and texts in language order, so saving an
//! unchanged database reproduces the same bytes.

use std::{
    io::{BufRead, ErrorKind, Write},
    path::Path,
};

use log::debug;
use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::{
    database::Database,
    error::Error,
    formats::{attribute, read_text},
    options::LoadOptions,
    state::DEFAULT_STATE,
    traits::Parser,
    types::{OutputFileSpec, TextEntry},
};

const ROOT: &[u8] = b"muidb";
const FORMAT_VERSION: &str = "1";

impl Parser for Database {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);

        let mut buf = Vec::new();
        let mut db = Database::new();
        let mut seen_root = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) if !seen_root => {
                    if e.local_name().as_ref() != ROOT {
                        return Err(Error::invalid_resource(format!(
                            "expected <muidb> root element, found <{}>",
                            String::from_utf8_lossy(e.local_name().as_ref())
                        )));
                    }
                    seen_root = true;
                }
                Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"item" => {
                    let id = item_id(e)?;
                    let (texts, comments) = parse_item_body(&id, &mut xml_reader)?;
                    db.insert_loaded(id, texts, comments);
                }
                Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"item" => {
                    let id = item_id(e)?;
                    db.insert_loaded(id, Vec::new(), Vec::new());
                }
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                    if e.local_name().as_ref() == b"file" =>
                {
                    let name = attribute(e, b"name")?
                        .ok_or_else(|| Error::invalid_resource("file tag missing 'name'"))?;
                    let lang = attribute(e, b"lang")?
                        .ok_or_else(|| Error::invalid_resource("file tag missing 'lang'"))?;
                    db.output_files.push(OutputFileSpec::new(name, lang));
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(Error::XmlParse(e)),
            }
            buf.clear();
        }

        if !seen_root {
            return Err(Error::invalid_resource("document has no <muidb> element"));
        }
        Ok(db)
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new_with_indent(&mut writer, b' ', 2);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        let mut root = BytesStart::new("muidb");
        root.push_attribute(("version", FORMAT_VERSION));
        xml_writer.write_event(Event::Start(root))?;

        xml_writer.write_event(Event::Start(BytesStart::new("items")))?;
        for item in self.items() {
            let mut elem = BytesStart::new("item");
            elem.push_attribute(("id", item.id()));
            xml_writer.write_event(Event::Start(elem))?;

            for comment in item.comments() {
                xml_writer.write_event(Event::Start(BytesStart::new("comment")))?;
                xml_writer.write_event(Event::Text(BytesText::new(comment)))?;
                xml_writer.write_event(Event::End(BytesEnd::new("comment")))?;
            }
            for (lang, entry) in item.texts() {
                let mut text = BytesStart::new("text");
                text.push_attribute(("lang", lang.as_str()));
                text.push_attribute(("state", entry.raw_state()));
                xml_writer.write_event(Event::Start(text))?;
                xml_writer.write_event(Event::Text(BytesText::new(entry.value())))?;
                xml_writer.write_event(Event::End(BytesEnd::new("text")))?;
            }

            xml_writer.write_event(Event::End(BytesEnd::new("item")))?;
        }
        xml_writer.write_event(Event::End(BytesEnd::new("items")))?;

        xml_writer.write_event(Event::Start(BytesStart::new("files")))?;
        for spec in &self.output_files {
            let mut file = BytesStart::new("file");
            file.push_attribute(("name", spec.name.as_str()));
            file.push_attribute(("lang", spec.lang.as_str()));
            xml_writer.write_event(Event::Empty(file))?;
        }
        xml_writer.write_event(Event::End(BytesEnd::new("files")))?;

        xml_writer.write_event(Event::End(BytesEnd::new("muidb")))?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

impl Database {
    /// Loads the database stored at `path`.
    ///
    /// With [`LoadOptions::create_if_missing`], a missing file yields an
    /// empty database bound to `path` instead of an I/O error.
    pub fn load<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self, Error> {
        let path = path.as_ref();
        match Database::read_from(path) {
            Ok(mut db) => {
                db.path = Some(path.to_path_buf());
                debug!(
                    "Loaded {}: {} items, {} output files",
                    path.display(),
                    db.len(),
                    db.output_files.len()
                );
                Ok(db)
            }
            Err(Error::Io(e)) if e.kind() == ErrorKind::NotFound && options.create_if_missing => {
                debug!("{} does not exist, starting empty", path.display());
                Ok(Database::with_path(path))
            }
            Err(e) => Err(e),
        }
    }

    /// Saves to the file this database is bound to.
    pub fn save(&self) -> Result<(), Error> {
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| Error::InvalidRecord("database is not bound to a file".to_string()))?;
        self.save_to(path)
    }

    /// Saves to `path`, replacing any previous file atomically.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        self.write_to(path)?;
        debug!("Saved {} items to {}", self.len(), path.display());
        Ok(())
    }
}

fn item_id(e: &BytesStart) -> Result<String, Error> {
    attribute(e, b"id")?
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::invalid_resource("item tag missing 'id'"))
}

type ItemBody = (Vec<(String, TextEntry)>, Vec<String>);

fn parse_item_body<R: BufRead>(id: &str, xml_reader: &mut Reader<R>) -> Result<ItemBody, Error> {
    let mut texts = Vec::new();
    let mut comments = Vec::new();

    let mut buf = Vec::new();
    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"text" => {
                    let (lang, state) = text_attributes(id, e)?;
                    let value = read_text(xml_reader, b"text")?;
                    texts.push((lang, TextEntry::new(value, state)));
                }
                b"comment" => comments.push(read_text(xml_reader, b"comment")?),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"text" => {
                    let (lang, state) = text_attributes(id, e)?;
                    texts.push((lang, TextEntry::new("", state)));
                }
                b"comment" => comments.push(String::new()),
                _ => {}
            },
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"item" => break,
            Ok(Event::Eof) => {
                return Err(Error::invalid_resource(format!(
                    "Unexpected EOF inside item {}",
                    id
                )));
            }
            Ok(_) => (),
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }
    Ok((texts, comments))
}

fn text_attributes(id: &str, e: &BytesStart) -> Result<(String, String), Error> {
    let lang = attribute(e, b"lang")?
        .filter(|lang| !lang.is_empty())
        .ok_or_else(|| Error::invalid_resource(format!("text of item {} missing 'lang'", id)))?;
    let state = attribute(e, b"state")?.unwrap_or_else(|| DEFAULT_STATE.to_string());
    Ok((lang, state))
}
