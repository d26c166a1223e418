//! # Document Model Module
//!
//! ## Purpose
//! Typed records for the three divisions of the constitutional text (Titulo,
//! Capitulo, Articulo), the tagged union describing the two shapes a Title's
//! source content can take, and the pagination envelope returned by every
//! list operation.
//!
//! ## Input/Output Specification
//! - **Input**: Parsed fields extracted from the loosely typed source tree
//! - **Output**: Immutable, serde-serializable records shared via `Arc`
//! - **Sharing**: An Articulo appears in the global map, its Capitulo's list
//!   and its Titulo's flattened list as the same allocation

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Smallest addressable unit of legal text, globally numbered.
///
/// Title and Chapter identifiers are denormalized onto the record so a search
/// hit carries its full location without extra lookups. Immutable once built;
/// lives as long as the index snapshot that created it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Articulo {
    /// Article number, unique across the whole document
    pub numero: u32,
    /// Owning Title number
    pub titulo_num: u32,
    /// Owning Title name (denormalized copy)
    pub titulo_nombre: String,
    /// Owning Chapter number, absent for Titles with Articles directly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capitulo_num: Option<u32>,
    /// Owning Chapter name, absent for Titles with Articles directly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capitulo_nombre: Option<String>,
    /// Full text of the article
    pub texto: String,
}

/// Sub-division of a Title, identified by an integer.
///
/// Chapter number 0 is a valid-but-unlabeled bucket used when the chapter
/// heading carries no parseable number.
#[derive(Debug, Clone, Serialize)]
pub struct Capitulo {
    /// Owning Title number
    pub titulo_num: u32,
    /// Owning Title name
    pub titulo_nombre: String,
    /// Chapter number, unique within its Title
    pub numero: u32,
    /// Chapter heading as it appears in the source
    pub nombre: String,
    /// Articles of this chapter, sorted ascending by number
    pub articulos: Vec<Arc<Articulo>>,
}

/// Top-level division of the constitutional text, identified by a Roman
/// numeral in its heading.
///
/// Number 0 is the sentinel for headings whose numeral cannot be parsed.
/// `articulos` is always the flattened list of the Title's own articles,
/// whether they arrive through chapters or directly.
#[derive(Debug, Clone, Serialize)]
pub struct Titulo {
    /// Title number, unique across the document
    pub numero: u32,
    /// Original heading, source of truth for the name
    pub nombre: String,
    /// Chapters, present only for chapter-structured Titles
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub capitulos: Vec<Arc<Capitulo>>,
    /// Flattened list of this Title's articles, sorted ascending by number
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub articulos: Vec<Arc<Articulo>>,
}

/// The two shapes a Title's content can take in the source tree, resolved
/// once at parse time rather than re-inspected per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TituloContenido {
    /// The Title groups its articles under a distinguished `Capitulos` entry
    PorCapitulos(BTreeMap<String, BTreeMap<String, String>>),
    /// The Title maps article keys to article text directly
    Plano(BTreeMap<String, String>),
}

/// Pagination envelope returned by every list operation.
#[derive(Debug, Clone, Serialize)]
pub struct Paginacion<T: Serialize> {
    /// Post-filter, pre-pagination item count
    pub total: usize,
    /// Page that was served (1-based, after clamping)
    pub pagina: i64,
    /// Page size that was served (after clamping)
    pub tamano_pagina: i64,
    /// The windowed slice of results
    pub items: Vec<T>,
}
