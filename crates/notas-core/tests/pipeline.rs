//! End-to-end tests for the extraction pipeline.
//!
//! Most tests use a MemorySource that hands out pre-built pages, so the
//! anchoring logic is exercised without PDF files. The last few go through
//! PdfSource with documents generated by lopdf.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use notas_core::error::PdfError;
use notas_core::extraction::{boa_vista, Coord, BOA_VISTA};
use notas_core::models::columns::*;
use notas_core::{
    assemble, AnchorRule, BatchJob, DocumentSource, ExecutionStatus, Extractor, GlyphPage,
    PdfSource, RegionOffset, Template, TemplateRegistry, PLACEHOLDER,
};
use pretty_assertions::assert_eq;

struct MemorySource {
    pages: HashMap<PathBuf, GlyphPage>,
}

impl MemorySource {
    fn new(pages: &[(&str, GlyphPage)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(path, page)| (PathBuf::from(path), page.clone()))
                .collect(),
        }
    }
}

impl DocumentSource for MemorySource {
    type Page = GlyphPage;

    fn open_first_page(&self, path: &Path) -> Result<GlyphPage, PdfError> {
        self.pages.get(path).cloned().ok_or_else(|| PdfError::Open {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such document"),
        })
    }
}

fn extractor(pages: &[(&str, GlyphPage)]) -> Extractor<MemorySource> {
    Extractor::new(Arc::new(TemplateRegistry::builtin()), MemorySource::new(pages))
}

fn retention_page(with_inss: bool) -> GlyphPage {
    let builder = GlyphPage::builder(595.0, 842.0).text(200.0, 500.0, 8.0, "Retenções Federais");
    let builder = if with_inss {
        builder.text(150.0, 515.0, 8.0, "INSS")
    } else {
        builder
    };
    builder.text(150.0, 525.0, 8.0, "R$ 42,00").build()
}

/// A condensed Boa Vista first page with every label in place.
fn boa_vista_page() -> GlyphPage {
    GlyphPage::builder(595.0, 842.0)
        .text(400.0, 40.0, 8.0, "Número da Nota")
        .text(400.0, 50.0, 8.0, "00001234")
        .text(400.0, 70.0, 8.0, "Código de Verificação")
        .text(400.0, 80.0, 8.0, "AB12CD34 emitida")
        .text(400.0, 100.0, 8.0, "Data e Hora de Emissão")
        .text(400.0, 109.0, 8.0, "05/09/2025 14:32:10")
        .text(200.0, 140.0, 8.0, "Prestador do(s) Serviço(s)")
        .text(60.0, 160.0, 8.0, "CPF/CNPJ:")
        .text(120.0, 160.0, 8.0, "12.345.678/0001-90")
        .text(40.0, 300.0, 8.0, "Classificação do Serviço")
        .text(40.0, 310.0, 8.0, "17.01 - Assessoria ou consultoria")
        .text(40.0, 320.0, 8.0, "de qualquer natureza")
        .text(300.0, 400.0, 8.0, "Valor do(s) Serviço(s)")
        .text(348.0, 409.0, 8.0, "R$ 1.500,00")
        .text(200.0, 500.0, 8.0, "Retenções Federais")
        .text(150.0, 515.0, 8.0, "INSS")
        .text(150.0, 525.0, 8.0, "R$ 165,00")
        .build()
}

// ---------------------------------------------------------------------------
// Single-stage anchor
// ---------------------------------------------------------------------------
#[test]
fn value_right_of_anchor() {
    let template = Template::new("inline").with_rule(AnchorRule::new(
        NUMERO_NF,
        "Número da Nota",
        RegionOffset::new(
            Coord::right(0.0),
            Coord::top(0.0),
            Coord::right(60.0),
            Coord::bottom(0.0),
        ),
    ));
    let page = GlyphPage::builder(595.0, 842.0)
        .text(100.0, 100.0, 8.0, "Número da Nota")
        .text(160.0, 100.0, 8.0, "12345")
        .text(100.0, 140.0, 8.0, "99999")
        .build();

    let fields = template.apply(&page);
    assert_eq!(fields.get(NUMERO_NF).map(String::as_str), Some("12345"));
}

#[test]
fn boa_vista_number_below_anchor() {
    let page = GlyphPage::builder(595.0, 842.0)
        .text(400.0, 40.0, 8.0, "Número da Nota")
        .text(400.0, 50.0, 8.0, "12345")
        .build();

    let record = extractor(&[("nf.pdf", page)]).extract(Path::new("nf.pdf"), BOA_VISTA);
    assert_eq!(record.status, ExecutionStatus::Success);
    assert_eq!(record.get(NUMERO_NF), Some("12345"));
}

// ---------------------------------------------------------------------------
// Two-stage anchor
// ---------------------------------------------------------------------------
#[test]
fn retention_through_secondary_anchor() {
    let record = extractor(&[("nf.pdf", retention_page(true))])
        .extract(Path::new("nf.pdf"), BOA_VISTA);

    assert_eq!(record.get(VALOR_RETENCAO), Some("R$ 42,00"));
}

#[test]
fn retention_absent_without_secondary_anchor() {
    let record = extractor(&[("nf.pdf", retention_page(false))])
        .extract(Path::new("nf.pdf"), BOA_VISTA);

    assert_eq!(record.status, ExecutionStatus::Success);
    assert_eq!(record.get(VALOR_RETENCAO), None);
}

#[test]
fn service_type_joins_wrapped_lines_near_right_edge() {
    let page = GlyphPage::builder(595.0, 842.0)
        .text(400.0, 300.0, 8.0, "Classificação do Serviço")
        .text(400.0, 310.0, 8.0, "17.01 - Assessoria ou consultoria")
        .text(400.0, 320.0, 8.0, "de qualquer natureza")
        .text(400.0, 360.0, 8.0, "Fora da região")
        .build();

    let record = extractor(&[("nf.pdf", page)]).extract(Path::new("nf.pdf"), BOA_VISTA);
    assert_eq!(
        record.get(TIPO_SERVICO),
        Some("17.01 - Assessoria ou consultoria de qualquer natureza")
    );
}

#[test]
fn service_type_keeps_only_text_inside_page() {
    // "(cont.)" starts beyond the 595 pt page edge.
    let page = GlyphPage::builder(595.0, 842.0)
        .text(480.0, 300.0, 8.0, "Classificação do Serviço")
        .text(480.0, 310.0, 8.0, "17.01 - Assessoria")
        .text(600.0, 310.0, 8.0, "(cont.)")
        .text(480.0, 320.0, 8.0, "de qualquer natureza")
        .build();

    let record = extractor(&[("nf.pdf", page)]).extract(Path::new("nf.pdf"), BOA_VISTA);
    assert_eq!(
        record.get(TIPO_SERVICO),
        Some("17.01 - Assessoria de qualquer natureza")
    );
}

// ---------------------------------------------------------------------------
// Status handling
// ---------------------------------------------------------------------------
#[test]
fn page_without_anchors_keeps_static_fields() {
    let page = GlyphPage::builder(595.0, 842.0)
        .text(40.0, 40.0, 10.0, "Documento sem rótulos conhecidos")
        .build();

    let record = extractor(&[("blank.pdf", page)]).extract(Path::new("blank.pdf"), BOA_VISTA);

    assert_eq!(record.status, ExecutionStatus::Success);
    assert_eq!(record.fields.len(), 1);
    assert_eq!(record.get(SERIE_NF), Some("1"));
}

#[test]
fn unknown_layout_is_unsupported() {
    let page = retention_page(true);
    let record = extractor(&[("nf.pdf", page)]).extract(Path::new("nf.pdf"), "atlantis");

    assert_eq!(record.status, ExecutionStatus::UnsupportedLayout);
    assert!(record.fields.is_empty());
}

#[test]
fn documents_are_isolated() {
    let full = GlyphPage::builder(595.0, 842.0)
        .text(400.0, 40.0, 8.0, "Número da Nota")
        .text(400.0, 50.0, 8.0, "777")
        .build();
    let empty = GlyphPage::builder(595.0, 842.0).build();
    let extractor = extractor(&[("a.pdf", full), ("b.pdf", empty)]);

    let first = extractor.extract(Path::new("a.pdf"), BOA_VISTA);
    let second = extractor.extract(Path::new("b.pdf"), BOA_VISTA);
    let again = extractor.extract(Path::new("a.pdf"), BOA_VISTA);

    assert_eq!(first.get(NUMERO_NF), Some("777"));
    assert_eq!(second.get(NUMERO_NF), None);
    assert_eq!(first, again);
}

#[test]
fn batch_keeps_order_and_statuses() {
    let extractor = extractor(&[("boa_vista/ok.pdf", boa_vista_page())]);
    let jobs = vec![
        BatchJob {
            path: "boa_vista/ok.pdf".into(),
            group: "boa_vista".into(),
            layout_key: BOA_VISTA.into(),
        },
        BatchJob {
            path: "boa_vista/missing.pdf".into(),
            group: "boa_vista".into(),
            layout_key: BOA_VISTA.into(),
        },
        BatchJob {
            path: "boa_vista/ok.pdf".into(),
            group: "manaus".into(),
            layout_key: "manaus".into(),
        },
    ];

    let records = extractor.extract_batch(&jobs);

    assert_eq!(records.len(), 3);
    assert!(records[0].status.is_success());
    assert!(matches!(records[1].status, ExecutionStatus::OpenError(_)));
    assert_eq!(records[2].status, ExecutionStatus::UnsupportedLayout);
    assert_eq!(records[2].source_group.as_deref(), Some("manaus"));

    let table = assemble(&records, &CANONICAL_COLUMNS);
    assert_eq!(table.len(), 3);

    let rows: Vec<_> = table.rows().collect();
    for row in &rows {
        assert_eq!(row.cells().len(), CANONICAL_COLUMNS.len());
    }

    // Every field of the complete document was found.
    for column in CANONICAL_COLUMNS {
        assert_ne!(rows[0].get(column), Some(PLACEHOLDER), "{column}");
    }
    assert_eq!(rows[0].get(NUMERO_NF), Some("00001234"));
    assert_eq!(rows[0].get(VALOR_RETENCAO), Some("R$ 165,00"));
    assert_eq!(rows[0].get(STATUS_EXECUCAO), Some("success"));

    // The failed documents only carry their group and status.
    for row in &rows[1..] {
        for column in CANONICAL_COLUMNS {
            if column == MUNICIPIO_NF || column == STATUS_EXECUCAO {
                assert_ne!(row.get(column), Some(PLACEHOLDER), "{column}");
            } else {
                assert_eq!(row.get(column), Some(PLACEHOLDER), "{column}");
            }
        }
    }
    assert_eq!(rows[1].get(MUNICIPIO_NF), Some("boa_vista"));
    assert!(rows[1]
        .get(STATUS_EXECUCAO)
        .is_some_and(|s| s.starts_with("open_error: ")));
    assert_eq!(rows[2].get(MUNICIPIO_NF), Some("manaus"));
    assert_eq!(rows[2].get(STATUS_EXECUCAO), Some("unsupported_layout"));

    assert_eq!(assemble(table.rows(), &CANONICAL_COLUMNS), table);
}

#[test]
fn inspect_reports_regions() {
    let extractor = extractor(&[("nf.pdf", retention_page(true))]);
    let traces = extractor.inspect(Path::new("nf.pdf"), BOA_VISTA).unwrap();

    assert_eq!(traces.len(), boa_vista().rules.len());
    let retention = traces.iter().find(|t| t.field == VALOR_RETENCAO).unwrap();
    assert!(retention.anchor.is_some());
    assert!(retention.search_region.is_some());
    assert!(retention.secondary.is_some());
    assert_eq!(retention.value.as_deref(), Some("R$ 42,00"));

    assert!(extractor.inspect(Path::new("nf.pdf"), "atlantis").is_err());
}

// ---------------------------------------------------------------------------
// Real PDF files
// ---------------------------------------------------------------------------

/// Courier text operations; `lines` are (x, baseline from bottom, text).
fn text_ops(lines: &[(i64, i64, &str)]) -> Vec<Operation> {
    let mut operations = Vec::new();
    for (x, y, text) in lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), 10.into()]));
        operations.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
        operations.push(Operation::new("ET", vec![]));
    }
    operations
}

/// A4 PDF with one page per entry of `pages`.
fn pdf_bytes(pages: Vec<Vec<Operation>>) -> Vec<u8> {
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

    let count = pages.len() as i64;
    let mut kids: Vec<Object> = Vec::new();
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

fn ascii_extractor() -> Extractor<PdfSource> {
    let mut registry = TemplateRegistry::new();
    registry
        .register(Template::new("ascii").with_rule(AnchorRule::new(
            NUMERO_NF,
            "Numero da Nota",
            RegionOffset::new(
                Coord::left(-10.0),
                Coord::bottom(0.0),
                Coord::page_right(0.0),
                Coord::bottom(20.0),
            ),
        )))
        .unwrap();
    Extractor::new(Arc::new(registry), PdfSource::default())
}

#[test]
fn pdf_file_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nota.pdf");
    std::fs::write(
        &path,
        pdf_bytes(vec![text_ops(&[(100, 742, "Numero da Nota"), (100, 727, "12345")])]),
    )
    .unwrap();

    let record = ascii_extractor().extract(&path, "ascii");
    assert_eq!(record.status, ExecutionStatus::Success);
    assert_eq!(record.get(NUMERO_NF), Some("12345"));
}

#[test]
fn broken_second_page_does_not_affect_first() {
    // Page 2 shows text without selecting a font.
    let broken = vec![
        Operation::new("BT", vec![]),
        Operation::new("Td", vec![100.into(), 700.into()]),
        Operation::new("Tj", vec![Object::string_literal("sem fonte")]),
        Operation::new("ET", vec![]),
    ];
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("duas_paginas.pdf");
    std::fs::write(
        &path,
        pdf_bytes(vec![
            text_ops(&[(100, 742, "Numero da Nota"), (100, 727, "12345")]),
            broken,
        ]),
    )
    .unwrap();

    let record = ascii_extractor().extract(&path, "ascii");
    assert_eq!(record.status, ExecutionStatus::Success);
    assert_eq!(record.get(NUMERO_NF), Some("12345"));
}

#[test]
fn second_page_text_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("duas_paginas.pdf");
    std::fs::write(
        &path,
        pdf_bytes(vec![
            text_ops(&[(100, 500, "Pagina um")]),
            text_ops(&[(100, 742, "Numero da Nota"), (100, 727, "99999")]),
        ]),
    )
    .unwrap();

    let record = ascii_extractor().extract(&path, "ascii");
    assert_eq!(record.status, ExecutionStatus::Success);
    assert_eq!(record.get(NUMERO_NF), None);
}

#[test]
fn corrupt_pdf_is_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.pdf");
    std::fs::write(&path, b"%PDF-1.4\nthis is not really a pdf").unwrap();

    let extractor = Extractor::new(Arc::new(TemplateRegistry::builtin()), PdfSource::default());
    let record = extractor.extract(&path, BOA_VISTA);

    assert!(matches!(record.status, ExecutionStatus::OpenError(_)));
    assert!(record.fields.is_empty());
}
