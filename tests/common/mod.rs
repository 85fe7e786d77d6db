//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use papervec::{PipelineConfig, SemanticConfig, VectorFormat};

/// Small 3-dimensional model covering the sample article.
pub const MODEL: &[(&str, [f32; 3])] = &[
    ("cell", [1.0, 0.0, 0.0]),
    ("divide", [0.0, 1.0, 0.0]),
    ("protein", [0.0, 0.0, 1.0]),
    ("bind", [0.5, 0.5, 0.0]),
    ("membrane", [-1.0, 0.25, 0.5]),
    ("the", [9.0, 9.0, 9.0]),
    ("table", [7.0, 7.0, 7.0]),
];

/// A JATS article whose selected prose reads "Cells divide." and
/// "Proteins bind membranes." once stripping is applied.
pub const SAMPLE_ARTICLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<article xmlns:xlink="http://www.w3.org/1999/xlink">
  <front>
    <article-meta>
      <title-group><article-title>Membrane biology</article-title></title-group>
      <abstract><p>Cells<sup>1</sup> divide.</p></abstract>
    </article-meta>
  </front>
  <body>
    <sec>
      <p>Proteins bind <xref ref-type="bibr">[2]</xref>membranes.</p>
      <table-wrap><caption><p>Table of proteins</p></caption>
        <table><tr><td>protein</td></tr></table>
      </table-wrap>
    </sec>
  </body>
</article>
"#;

/// Writes a word2vec text file from `entries`.
pub fn write_model(dir: &Path, entries: &[(&str, [f32; 3])]) -> PathBuf {
    let mut out = format!("{} 3\n", entries.len());
    for (word, v) in entries {
        out.push_str(&format!("{word} {} {} {}\n", v[0], v[1], v[2]));
    }
    let path = dir.join("word_model.wv.txt");
    fs::write(&path, out).unwrap();
    path
}

/// Default configuration pointed at a freshly written [`MODEL`].
pub fn config_with_model(dir: &Path) -> PipelineConfig {
    PipelineConfig {
        semantic: SemanticConfig {
            word_vectors_path: write_model(dir, MODEL),
            word_vectors_format: VectorFormat::Text,
        },
        ..Default::default()
    }
}

/// Builds a PDF with one text line per page, in order.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 11.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Writes a reference embeddings TSV: a header, then `id\tjournal\tv..` rows.
pub fn write_reference(
    dir: &Path,
    rows: &[(String, Vec<f64>)],
    trailing_newline: bool,
) -> PathBuf {
    let dim = rows.first().map_or(0, |(_, v)| v.len());
    let mut header = vec!["pmcid".to_string(), "journal".to_string()];
    header.extend((0..dim).map(|i| format!("d{i}")));

    let mut lines = vec![header.join("\t")];
    for (id, vector) in rows {
        let mut fields = vec![id.clone(), "J Test".to_string()];
        fields.extend(vector.iter().map(|v| v.to_string()));
        lines.push(fields.join("\t"));
    }
    let mut contents = lines.join("\n");
    if trailing_newline {
        contents.push('\n');
    }
    let path = dir.join("paper_embeddings.tsv");
    fs::write(&path, contents).unwrap();
    path
}

/// Deterministic pseudo-random vector in `[-0.5, 0.5)`.
pub fn seeded_vector(seed: u64, dim: usize) -> Vec<f64> {
    let mut state = seed
        .wrapping_mul(6_364_136_223_846_793_005)
        .wrapping_add(1);
    (0..dim)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            ((state >> 33) as f64 / (1u64 << 31) as f64) - 0.5
        })
        .collect()
}
