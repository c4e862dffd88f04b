//! This bench test parses a synthetic catalog: description parsing on its own,
//! and a full build of a directory of department files.

#![allow(missing_docs)]

use std::{fmt::Write as _, fs, path::Path};

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use requisites::{CatalogDirectory, Config, ParseMetrics, RequirementParser};
use tempfile::TempDir;

const DESCRIPTIONS: [&str; 5] = [
    "Prerequisites: CSE 12 and (CSE 15L or CSE 30).",
    "Prerequisites: MATH 20A, 20B, and 20C; CSE 11/CSE 8B.",
    "Prerequisites: one of CSE 21, CSE 101, or MATH 154.",
    "Prerequisites: CSE 100A-C with a grade of C- or better. Corequisites: CSE 110.",
    "Prerequisites: BILD 1, BILD 2; CHEM 6A/6B, and (MATH 10A, 20A).",
];

/// Writes `departments` department files of 50 listings each
fn preseed_catalog(root: &Path, departments: usize) {
    let input = root.join("intermediate");
    fs::create_dir_all(&input).unwrap();
    for d in 0..departments {
        let letter = |i: usize| char::from(b'A' + u8::try_from(i % 26).unwrap());
        let subject = format!("{}{}X", letter(d / 26), letter(d));
        let mut lines = String::new();
        for n in 1..=50 {
            let description = DESCRIPTIONS[n % DESCRIPTIONS.len()];
            writeln!(
                lines,
                r#"{{"title_line": "{subject} {n}. Course {n} (4)", "description": "{description}", "anchor": "{n}"}}"#
            )
            .unwrap();
        }
        fs::write(input.join(format!("{subject}.jsonl")), lines).unwrap();
    }
}

fn parse_descriptions(c: &mut Criterion) {
    let parser = RequirementParser::new();
    c.bench_function("parse descriptions", |b| {
        b.iter(|| {
            let mut metrics = ParseMetrics::default();
            for description in DESCRIPTIONS {
                parser.parse_requirements(description, &mut metrics);
            }
            metrics
        });
    });
}

fn build_catalog(c: &mut Criterion) {
    c.bench_function("build catalog", |b| {
        b.iter_batched(
            || {
                let tmp_dir = TempDir::new().unwrap();
                preseed_catalog(tmp_dir.path(), 40);
                tmp_dir
            },
            |tmp_dir| {
                CatalogDirectory::with_config(tmp_dir.path().to_path_buf(), Config::default())
                    .build()
                    .unwrap()
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, parse_descriptions, build_catalog);
criterion_main!(benches);
