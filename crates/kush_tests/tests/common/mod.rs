//! Shared harness for the end-to-end suites.

#![allow(dead_code)]

use kush_frontend::{Batch, CompileOptions, DiagnosticCode, Session, SourceFile};

/// Compiles a single unit under a fixed path.
pub fn compile(source: &str) -> Batch {
    Session::default().compile("sample.k", source)
}

/// Compiles several `(path, package, text)` units as one batch.
pub fn compile_files(files: &[(&str, &str, &str)]) -> Batch {
    let files = files
        .iter()
        .map(|(path, package, text)| SourceFile::with_package(*path, *package, *text))
        .collect();
    Session::default().compile_batch(files)
}

/// Compiles a batch with explicit options.
pub fn compile_with_options(options: CompileOptions, files: &[(&str, &str, &str)]) -> Batch {
    let files = files
        .iter()
        .map(|(path, package, text)| SourceFile::with_package(*path, *package, *text))
        .collect();
    Session::new(options).compile_batch(files)
}

/// Wraps statement-level source in a function body; the grammar places
/// statements inside functions.
pub fn compile_fragment(fragment: &str) -> Batch {
    compile(&format!("void test() {{ {} }}", fragment))
}

/// The diagnostic codes of a batch, in report order.
pub fn codes(batch: &Batch) -> Vec<DiagnosticCode> {
    batch.diagnostics.iter().map(|d| d.code).collect()
}
