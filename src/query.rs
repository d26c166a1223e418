//! # Query Engine Module
//!
//! ## Purpose
//! Generic filter, sort and paginate operators applied uniformly across the
//! three record kinds, always in that fixed order.
//!
//! ## Input/Output Specification
//! - **Input**: `Vec<Arc<T>>` drawn from an index snapshot, plus the caller's
//!   query, sort key, direction and page window
//! - **Output**: Freshly allocated result sequences; the snapshot is never
//!   mutated
//! - **Fallbacks**: Unknown sort keys resolve to `numero`; out-of-range pages
//!   yield an empty slice, never an error
//!
//! ## Key Features
//! - Case-insensitive substring containment over kind-specific fields
//! - Stable sort with a fixed key table per kind
//! - Bounds-clamped pagination returning the pre-pagination total

use crate::document::{Articulo, Capitulo, Titulo};
use std::sync::Arc;

/// Default sort key shared by all three record kinds.
const DEFAULT_SORT_KEY: &str = "numero";

/// A record that can be filtered and sorted by the query engine.
pub trait Queryable {
    /// Case-insensitive substring match; `needle` arrives already lowercased.
    fn matches(&self, needle: &str) -> bool;

    /// Resolve a sort key name to this record's value for it. Unknown names
    /// fall back to the kind's default key.
    fn sort_value(&self, key: &str) -> SortValue;
}

/// Comparable sort value; numeric for counting keys, textual for name keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Number(i64),
    Text(String),
}

/// Sort direction; anything other than `desc` means ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn from_param(orden: Option<&str>) -> Self {
        match orden {
            Some(o) if o.eq_ignore_ascii_case("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }
}

/// Requested page window, clamped before use.
#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    /// 1-based page number
    pub pagina: i64,
    /// Items per page
    pub tamano_pagina: i64,
}

impl PageParams {
    /// Clamp the window: non-positive values become 1, the page size is
    /// capped at `max_page_size`.
    pub fn clamped(self, max_page_size: i64) -> Self {
        Self {
            pagina: self.pagina.max(1),
            tamano_pagina: self.tamano_pagina.clamp(1, max_page_size.max(1)),
        }
    }
}

impl Queryable for Articulo {
    fn matches(&self, needle: &str) -> bool {
        self.texto.to_lowercase().contains(needle)
            || self.titulo_nombre.to_lowercase().contains(needle)
            || self
                .capitulo_nombre
                .as_ref()
                .is_some_and(|nombre| nombre.to_lowercase().contains(needle))
    }

    fn sort_value(&self, key: &str) -> SortValue {
        match key {
            "longitud" => SortValue::Number(self.texto.chars().count() as i64),
            "titulo" => SortValue::Number(self.titulo_num as i64),
            "capitulo" => SortValue::Number(self.capitulo_num.unwrap_or(0) as i64),
            _ => SortValue::Number(self.numero as i64),
        }
    }
}

impl Queryable for Capitulo {
    fn matches(&self, needle: &str) -> bool {
        self.nombre.to_lowercase().contains(needle)
            || self.titulo_nombre.to_lowercase().contains(needle)
    }

    fn sort_value(&self, key: &str) -> SortValue {
        match key {
            "titulo" => SortValue::Number(self.titulo_num as i64),
            "articulos" => SortValue::Number(self.articulos.len() as i64),
            _ => SortValue::Number(self.numero as i64),
        }
    }
}

impl Queryable for Titulo {
    fn matches(&self, needle: &str) -> bool {
        self.nombre.to_lowercase().contains(needle)
    }

    fn sort_value(&self, key: &str) -> SortValue {
        match key {
            "nombre" => SortValue::Text(self.nombre.clone()),
            "capitulos" => SortValue::Number(self.capitulos.len() as i64),
            "articulos" => SortValue::Number(self.articulos.len() as i64),
            _ => SortValue::Number(self.numero as i64),
        }
    }
}

/// Keep only items matching the query substring; an empty or absent query is
/// the identity.
pub fn filter<T: Queryable>(items: Vec<Arc<T>>, query: Option<&str>) -> Vec<Arc<T>> {
    match query {
        Some(q) if !q.is_empty() => {
            let needle = q.to_lowercase();
            items
                .into_iter()
                .filter(|item| item.matches(&needle))
                .collect()
        }
        _ => items,
    }
}

/// Stable sort by the named key. Unknown key names fall back to `numero`;
/// descending order reverses the comparison, so equal elements keep their
/// pre-sort relative order either way.
pub fn sort_items<T: Queryable>(
    mut items: Vec<Arc<T>>,
    key: Option<&str>,
    order: SortOrder,
) -> Vec<Arc<T>> {
    let key = key.unwrap_or(DEFAULT_SORT_KEY).to_lowercase();
    match order {
        SortOrder::Asc => items.sort_by(|a, b| a.sort_value(&key).cmp(&b.sort_value(&key))),
        SortOrder::Desc => items.sort_by(|a, b| b.sort_value(&key).cmp(&a.sort_value(&key))),
    }
    items
}

/// Slice out the requested page window.
///
/// Returns the windowed slice and the total pre-pagination count so clients
/// can compute page counts. Parameters are clamped to a minimum of 1;
/// windows past the end yield an empty slice.
pub fn paginate<T>(items: Vec<T>, params: PageParams) -> (Vec<T>, usize) {
    let total = items.len();
    let pagina = params.pagina.max(1);
    let tamano = params.tamano_pagina.max(1);
    let inicio = (pagina - 1).saturating_mul(tamano);

    if inicio >= total as i64 {
        return (Vec::new(), total);
    }

    let window = items
        .into_iter()
        .skip(inicio as usize)
        .take(tamano as usize)
        .collect();
    (window, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn articulo(numero: u32, texto: &str) -> Arc<Articulo> {
        Arc::new(Articulo {
            numero,
            titulo_num: 1,
            titulo_nombre: "TITULO I - La Salud Nacional".to_string(),
            capitulo_num: Some(1),
            capitulo_nombre: Some("Capitulo 1 - Disposiciones".to_string()),
            texto: texto.to_string(),
        })
    }

    fn sample() -> Vec<Arc<Articulo>> {
        vec![
            articulo(3, "El Estado velará por la salud pública."),
            articulo(1, "La Nación panameña es soberana."),
            articulo(2, "Todo individuo tiene derecho a la educación."),
        ]
    }

    #[test]
    fn test_empty_query_is_identity() {
        let items = sample();
        assert_eq!(filter(items.clone(), None).len(), 3);
        assert_eq!(filter(items, Some("")).len(), 3);
    }

    #[test]
    fn test_filter_matches_text_and_owner_names() {
        let items = sample();
        // Matches the article text.
        let hits = filter(items.clone(), Some("SALUD PÚBLICA"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].numero, 3);
        // Matches the denormalized title name on every record.
        let hits = filter(items, Some("salud nacional"));
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let once = filter(sample(), Some("derecho"));
        let twice = filter(once.clone(), Some("derecho"));
        let numeros = |v: &[Arc<Articulo>]| v.iter().map(|a| a.numero).collect::<Vec<_>>();
        assert_eq!(numeros(&once), numeros(&twice));
    }

    #[test]
    fn test_sort_default_and_unknown_key() {
        let sorted = sort_items(sample(), None, SortOrder::Asc);
        let numeros: Vec<u32> = sorted.iter().map(|a| a.numero).collect();
        assert_eq!(numeros, vec![1, 2, 3]);

        let sorted = sort_items(sample(), Some("inexistente"), SortOrder::Asc);
        let numeros: Vec<u32> = sorted.iter().map(|a| a.numero).collect();
        assert_eq!(numeros, vec![1, 2, 3]);
    }

    #[test]
    fn test_desc_reverses_total_order() {
        let asc = sort_items(sample(), Some("numero"), SortOrder::Asc);
        let mut desc = sort_items(sample(), Some("numero"), SortOrder::Desc);
        desc.reverse();
        let numeros = |v: &[Arc<Articulo>]| v.iter().map(|a| a.numero).collect::<Vec<_>>();
        assert_eq!(numeros(&asc), numeros(&desc));
    }

    #[test]
    fn test_sort_by_text_length() {
        let sorted = sort_items(sample(), Some("LONGITUD"), SortOrder::Asc);
        let lengths: Vec<usize> = sorted.iter().map(|a| a.texto.chars().count()).collect();
        assert!(lengths.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_paginate_clamps_and_windows() {
        let items: Vec<u32> = (1..=10).collect();
        let (page, total) = paginate(
            items.clone(),
            PageParams {
                pagina: 0,
                tamano_pagina: -5,
            },
        );
        assert_eq!(total, 10);
        assert_eq!(page, vec![1]);

        let (page, total) = paginate(
            items,
            PageParams {
                pagina: 99,
                tamano_pagina: 4,
            },
        );
        assert_eq!(total, 10);
        assert!(page.is_empty());
    }

    #[test]
    fn test_paginate_concatenation_reconstructs_list() {
        let items: Vec<u32> = (1..=23).collect();
        for tamano in [1_i64, 4, 7, 23, 50] {
            let mut reconstructed = Vec::new();
            let mut pagina = 1;
            loop {
                let (window, total) = paginate(
                    items.clone(),
                    PageParams {
                        pagina,
                        tamano_pagina: tamano,
                    },
                );
                assert_eq!(total, 23);
                if window.is_empty() {
                    break;
                }
                reconstructed.extend(window);
                pagina += 1;
            }
            assert_eq!(reconstructed, items, "tamano {}", tamano);
        }
    }

    #[test]
    fn test_page_params_clamped() {
        let params = PageParams {
            pagina: -3,
            tamano_pagina: 1000,
        }
        .clamped(200);
        assert_eq!(params.pagina, 1);
        assert_eq!(params.tamano_pagina, 200);
    }
}
