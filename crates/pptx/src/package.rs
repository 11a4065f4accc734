//! In-memory OPC package: read from a ZIP container, edited part by part,
//! written back out.

use crate::blank;
use crate::parts::{
    parse_relationships, rels_path_for, ContentTypes, Relationship, CONTENT_TYPES_PART,
};
use deckgen_core::{Error, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Every part of a package, keyed by part name without the leading slash.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    parts: BTreeMap<String, Vec<u8>>,
}

impl Package {
    /// Open a package file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            Error::TemplateLoad(format!("Failed to open '{}': {}", path.display(), e))
        })?;

        Self::from_reader(BufReader::new(file))
    }

    /// Read a package from any seekable ZIP source.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::TemplateLoad(format!("Not a ZIP package: {}", e)))?;

        let mut parts = BTreeMap::new();
        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| Error::Zip(format!("Failed to read entry {}: {}", i, e)))?;
            if file.is_dir() {
                continue;
            }

            let name = file.name().trim_start_matches('/').to_string();
            let mut content = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut content)
                .map_err(|e| Error::Zip(format!("Failed to read '{}': {}", name, e)))?;
            parts.insert(name, content);
        }

        Ok(Self { parts })
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    /// The built-in blank presentation.
    pub fn blank() -> Self {
        let parts = blank::parts()
            .into_iter()
            .map(|(name, xml)| (name, xml.into_bytes()))
            .collect();
        Self { parts }
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.parts.contains_key(name.trim_start_matches('/'))
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .get(name.trim_start_matches('/'))
            .map(|bytes| bytes.as_slice())
    }

    /// A part decoded as UTF-8 text.
    pub fn read_xml(&self, name: &str) -> Result<String> {
        let bytes = self
            .part(name)
            .ok_or_else(|| Error::Zip(format!("Part not found in package: '{}'", name)))?;

        let text = std::str::from_utf8(bytes)
            .map_err(|e| Error::Xml(format!("Part '{}' is not UTF-8: {}", name, e)))?;
        Ok(text.trim_start_matches('\u{feff}').to_string())
    }

    pub fn set_part(&mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) {
        let name: String = name.into();
        self.parts
            .insert(name.trim_start_matches('/').to_string(), content.into());
    }

    pub fn remove_part(&mut self, name: &str) -> Option<Vec<u8>> {
        self.parts.remove(name.trim_start_matches('/'))
    }

    /// Part names in sorted order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(|k| k.as_str())
    }

    pub fn content_types(&self) -> Result<ContentTypes> {
        ContentTypes::parse(&self.read_xml(CONTENT_TYPES_PART)?)
    }

    pub fn set_content_types(&mut self, types: &ContentTypes) {
        self.set_part(CONTENT_TYPES_PART, types.to_xml());
    }

    /// Relationships of a part; a part without a `.rels` part has none.
    pub fn relationships(&self, part: &str) -> Result<Vec<Relationship>> {
        let rels_path = rels_path_for(part);
        if !self.has_part(&rels_path) {
            return Ok(Vec::new());
        }
        parse_relationships(&self.read_xml(&rels_path)?)
    }

    /// Serialize to a ZIP container, `[Content_Types].xml` first.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        let ordered = self
            .parts
            .iter()
            .filter(|(name, _)| name.as_str() == CONTENT_TYPES_PART)
            .chain(
                self.parts
                    .iter()
                    .filter(|(name, _)| name.as_str() != CONTENT_TYPES_PART),
            );

        for (name, content) in ordered {
            zip.start_file(name.as_str(), options)
                .map_err(|e| Error::Zip(format!("Failed to start '{}': {}", name, e)))?;
            zip.write_all(content)?;
        }

        let cursor = zip
            .finish()
            .map_err(|e| Error::Zip(format!("Failed to finish package: {}", e)))?;
        Ok(cursor.into_inner())
    }
}
