use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Bounding rectangle of a block on its page, in PDF user-space units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockBounds {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

/// One contiguous text block on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub text: String,
    /// Geometry, when the backend knows it. The segmenter ignores it.
    pub bounds: Option<BlockBounds>,
}

impl TextBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bounds: None,
        }
    }
}

/// A page and its blocks in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPage {
    pub number: u32, // 1-based
    pub blocks: Vec<TextBlock>,
}

/// A table-of-contents entry as declared by the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocEntry {
    pub level: u32,
    pub title: String,
    pub page: u32, // 1-based
}

/// Extracted document: ordered pages plus the declared TOC (possibly empty).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub pages: Vec<RawPage>,
    pub toc: Vec<TocEntry>,
}

impl RawDocument {
    /// Build a document from per-page block texts, numbering pages from 1.
    pub fn from_pages<P, B>(pages: P) -> Self
    where
        P: IntoIterator<Item = Vec<B>>,
        B: Into<String>,
    {
        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(idx, blocks)| RawPage {
                number: idx as u32 + 1,
                blocks: blocks.into_iter().map(TextBlock::new).collect(),
            })
            .collect();
        Self {
            pages,
            toc: Vec::new(),
        }
    }

    pub fn with_toc(mut self, toc: Vec<TocEntry>) -> Self {
        self.toc = toc;
        self
    }

    /// Page -> title projection of the TOC. Later entries for the same page win.
    pub fn toc_titles(&self) -> BTreeMap<u32, String> {
        self.toc
            .iter()
            .map(|entry| (entry.page, entry.title.clone()))
            .collect()
    }
}
