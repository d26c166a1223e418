//! # Document Parser and Index Builder Module
//!
//! ## Purpose
//! Walks the loosely typed source tree and assembles the typed records into
//! the four lookup structures of an index snapshot: by Title name, by Title
//! number, by (Title number, Chapter number) and by Article number.
//!
//! ## Input/Output Specification
//! - **Input**: Raw source tree (`serde_json::Value`), a mapping from Title
//!   label to either chapter-grouped or flat article content
//! - **Output**: Immutable `IndexSnapshot` with deterministically ordered maps
//! - **Error policy**: Never fails on structurally odd documents; malformed
//!   entries degrade to sentinel numbering (0) or are skipped
//!
//! ## Key Features
//! - Shape variance resolved once into `TituloContenido`
//! - Last-write-wins on duplicate Article numbers and colliding Title numbers
//! - All Chapter and Article sequences sorted ascending by number

use crate::document::{Articulo, Capitulo, Titulo, TituloContenido};
use crate::roman;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Distinguished key marking a chapter-structured Title in the source tree.
const CAPITULOS_KEY: &str = "Capitulos";

/// Immutable bundle of lookup structures over one version of the source
/// document. One snapshot exists per distinct source mtime; snapshots are
/// rebuilt wholesale, never patched incrementally.
#[derive(Debug)]
pub struct IndexSnapshot {
    /// Titles keyed by their original heading
    pub titulos: BTreeMap<String, Arc<Titulo>>,
    /// Titles re-keyed by number; colliding numbers are last-write-wins
    pub titulos_por_num: BTreeMap<u32, Arc<Titulo>>,
    /// Chapters keyed by (Title number, Chapter number)
    pub capitulos: BTreeMap<(u32, u32), Arc<Capitulo>>,
    /// Articles keyed by their global number
    pub articulos: BTreeMap<u32, Arc<Articulo>>,
    /// Verbatim source tree, served by the whole-document endpoint
    pub raw: Arc<Value>,
}

impl TituloContenido {
    /// Resolve the shape of one Title's source content.
    ///
    /// A mapping carrying the distinguished `Capitulos` entry is
    /// chapter-structured; any other mapping is a flat article listing.
    /// Non-mapping values and non-string article texts degrade to empty
    /// content rather than failing.
    pub fn classify(value: &Value) -> TituloContenido {
        let Some(object) = value.as_object() else {
            return TituloContenido::Plano(BTreeMap::new());
        };

        if let Some(capitulos) = object.get(CAPITULOS_KEY).and_then(Value::as_object) {
            let mut chapters = BTreeMap::new();
            for (nombre_capitulo, contenido) in capitulos {
                let articles = contenido
                    .as_object()
                    .map(collect_string_entries)
                    .unwrap_or_default();
                chapters.insert(nombre_capitulo.clone(), articles);
            }
            return TituloContenido::PorCapitulos(chapters);
        }

        TituloContenido::Plano(collect_string_entries(object))
    }
}

fn collect_string_entries(object: &serde_json::Map<String, Value>) -> BTreeMap<String, String> {
    object
        .iter()
        .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
        .collect()
}

/// Mutable accumulation state for one Title during traversal; frozen into an
/// `Arc<Titulo>` once its content has been walked.
struct TituloBuilder {
    numero: u32,
    nombre: String,
    capitulos: Vec<Arc<Capitulo>>,
    articulos: Vec<Arc<Articulo>>,
}

impl TituloBuilder {
    fn finish(mut self) -> Arc<Titulo> {
        self.capitulos.sort_by_key(|c| c.numero);
        self.articulos.sort_by_key(|a| a.numero);
        Arc::new(Titulo {
            numero: self.numero,
            nombre: self.nombre,
            capitulos: self.capitulos,
            articulos: self.articulos,
        })
    }
}

/// Build a fresh index snapshot from the raw source tree.
///
/// A non-mapping root yields an empty (but valid) snapshot; per-entry
/// malformations are absorbed by sentinel numbering and skipping, so this
/// function cannot fail.
pub fn build_index(raw: Arc<Value>) -> IndexSnapshot {
    let mut titulos: BTreeMap<String, Arc<Titulo>> = BTreeMap::new();
    let mut capitulos: BTreeMap<(u32, u32), Arc<Capitulo>> = BTreeMap::new();
    let mut articulos: BTreeMap<u32, Arc<Articulo>> = BTreeMap::new();

    let source = raw.as_object().cloned().unwrap_or_default();

    for (nombre_titulo, contenido_titulo) in &source {
        let titulo_num = roman::extract_title_number(nombre_titulo).unwrap_or(0);
        let mut builder = TituloBuilder {
            numero: titulo_num,
            nombre: nombre_titulo.clone(),
            capitulos: Vec::new(),
            articulos: Vec::new(),
        };

        match TituloContenido::classify(contenido_titulo) {
            TituloContenido::PorCapitulos(chapters) => {
                for (nombre_capitulo, entradas) in chapters {
                    let capitulo_num = roman::extract_chapter_number(&nombre_capitulo).unwrap_or(0);
                    let mut lista = Vec::new();
                    for (key, texto) in entradas {
                        let Some(numero) = roman::extract_article_number(&key) else {
                            continue;
                        };
                        let articulo = Arc::new(Articulo {
                            numero,
                            titulo_num,
                            titulo_nombre: nombre_titulo.clone(),
                            capitulo_num: Some(capitulo_num),
                            capitulo_nombre: Some(nombre_capitulo.clone()),
                            texto,
                        });
                        articulos.insert(numero, articulo.clone());
                        builder.articulos.push(articulo.clone());
                        lista.push(articulo);
                    }
                    lista.sort_by_key(|a| a.numero);
                    let capitulo = Arc::new(Capitulo {
                        titulo_num,
                        titulo_nombre: nombre_titulo.clone(),
                        numero: capitulo_num,
                        nombre: nombre_capitulo,
                        articulos: lista,
                    });
                    capitulos.insert((titulo_num, capitulo_num), capitulo.clone());
                    builder.capitulos.push(capitulo);
                }
            }
            TituloContenido::Plano(entradas) => {
                for (key, texto) in entradas {
                    let Some(numero) = roman::extract_article_number(&key) else {
                        continue;
                    };
                    let articulo = Arc::new(Articulo {
                        numero,
                        titulo_num,
                        titulo_nombre: nombre_titulo.clone(),
                        capitulo_num: None,
                        capitulo_nombre: None,
                        texto,
                    });
                    articulos.insert(numero, articulo.clone());
                    builder.articulos.push(articulo);
                }
            }
        }

        titulos.insert(nombre_titulo.clone(), builder.finish());
    }

    // Re-key by number; Title number 0 can collide across several
    // unparseable headings, last write wins.
    let mut titulos_por_num = BTreeMap::new();
    for titulo in titulos.values() {
        titulos_por_num.insert(titulo.numero, titulo.clone());
    }

    IndexSnapshot {
        titulos,
        titulos_por_num,
        capitulos,
        articulos,
        raw,
    }
}
