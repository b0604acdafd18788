//! Common test utilities for gatecfg tests

#![allow(dead_code)]

use std::path::PathBuf;
use tempfile::TempDir;

/// Creates a temporary directory holding `setup.cfg` with `content`
pub fn create_document(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("setup.cfg");
    std::fs::write(&path, content).expect("Failed to write setup.cfg");
    (dir, path)
}

/// Creates a temporary directory with no document
pub fn create_empty_project() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("setup.cfg");
    (dir, path)
}

/// A realistic quality-gate document with one section per consumer
pub const SAMPLE_SETUP_CFG: &str = r#"[metadata]
description-file = README.rst

[flake8]
ignore=
    E203, # Whitespace before ':'
    E266, # Too many leading '#' for block comment
    W503, # Line break occurred before a binary operator
    P1,  # unindexed parameters in the str.format, see:
    # https://pypi.org/project/flake8-string-format/
max_line_length=79
max-complexity = 15
select=B,C,E,F,W,T4,B902,T,P
show_source=true
count=true

[isort]
include_trailing_comma=true
known_first_party=dvc,tests
known_third_party=PyInstaller,boto3,colorama,configobj,distro,git,mock
line_length=79
force_grid_wrap=0
use_parentheses=True
multi_line_output=3

[tool:pytest]
addopts = -ra
testpaths = tests

[mypy]
files = dvc
ignore_missing_imports = true
"#;

/// Same document with `[isort]` declared twice; the second header is line 17
pub const DUPLICATE_ISORT: &str = r#"[flake8]
max_line_length=79

[isort]
line_length=79
force_grid_wrap=0
use_parentheses=True
multi_line_output=3
include_trailing_comma=true
known_first_party=dvc,tests

[mypy]
files = dvc

# second copy
# should be rejected
[isort]
line_length=99
"#;

/// Schema-violating document: valid syntax, wrong types
pub const BAD_TYPES: &str = r#"[flake8]
max_line_length=seventy-nine

[mypy]
ignore_missing_imports = sometimes
"#;
