//! XML source discovery under a directory tree.

use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use regex::Regex;

use crate::conf::C_EXT_XML;
use crate::spec::{EnumScanPatternMode, ScanError, SpecScanOptions};

////////////////////////////////////////////////////////////////////////////////
// #region PatternMatching

#[derive(Debug, Clone)]
pub(crate) enum TypeScanPatternSeq {
    Literal(Vec<String>),
    Glob(Vec<GlobMatcher>),
    Regex(Vec<Regex>),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct SpecScanPatterns {
    pub(crate) patterns_include_files: Option<TypeScanPatternSeq>,
    pub(crate) patterns_exclude_files: Option<TypeScanPatternSeq>,
}

impl SpecScanPatterns {
    pub(crate) fn from_raw(
        patterns_include_files: Option<&[String]>,
        patterns_exclude_files: Option<&[String]>,
        rule_pattern: EnumScanPatternMode,
    ) -> Result<Self, ScanError> {
        Ok(Self {
            patterns_include_files: _compile(patterns_include_files, rule_pattern)?,
            patterns_exclude_files: _compile(patterns_exclude_files, rule_pattern)?,
        })
    }
}

fn _compile(
    patterns: Option<&[String]>,
    rule_pattern: EnumScanPatternMode,
) -> Result<Option<TypeScanPatternSeq>, ScanError> {
    let Some(patterns) = patterns else {
        return Ok(None);
    };
    if patterns.is_empty() {
        return Ok(None);
    }

    match rule_pattern {
        EnumScanPatternMode::Literal => Ok(Some(TypeScanPatternSeq::Literal(patterns.to_vec()))),
        EnumScanPatternMode::Glob => {
            let mut l_glob = Vec::with_capacity(patterns.len());
            for pattern in patterns {
                let matcher = Glob::new(pattern)
                    .map_err(|e| {
                        ScanError::InvalidPattern(format!("Invalid pattern in include/exclude: {e}"))
                    })?
                    .compile_matcher();
                l_glob.push(matcher);
            }
            Ok(Some(TypeScanPatternSeq::Glob(l_glob)))
        }
        EnumScanPatternMode::Regex => {
            let mut l_regex = Vec::with_capacity(patterns.len());
            for pattern in patterns {
                let regex = Regex::new(pattern).map_err(|e| {
                    ScanError::InvalidPattern(format!("Invalid pattern in include/exclude: {e}"))
                })?;
                l_regex.push(regex);
            }
            Ok(Some(TypeScanPatternSeq::Regex(l_regex)))
        }
    }
}

fn _is_pattern_matching(value: &str, patterns: Option<&TypeScanPatternSeq>) -> bool {
    match patterns {
        None => false,
        Some(TypeScanPatternSeq::Literal(v)) => v.iter().any(|p| value.contains(p)),
        Some(TypeScanPatternSeq::Glob(v)) => v.iter().any(|p| p.is_match(value)),
        Some(TypeScanPatternSeq::Regex(v)) => v.iter().any(|p| p.is_match(value)),
    }
}

pub(crate) fn should_exclude_by_patterns(value: &str, patterns: &SpecScanPatterns) -> bool {
    let b_included = match patterns.patterns_include_files {
        None => true,
        Some(_) => _is_pattern_matching(value, patterns.patterns_include_files.as_ref()),
    };
    !b_included || _is_pattern_matching(value, patterns.patterns_exclude_files.as_ref())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DirectoryWalk

/// Discover XML files under `dir_source`, depth-first with per-directory
/// name ordering, so the result is deterministic for a given tree.
///
/// Only the file basename is matched against include/exclude patterns;
/// non-`.xml` entries are never returned. Unreadable subdirectories are
/// skipped.
pub fn scan_xml_files<P>(dir_source: P, options: &SpecScanOptions) -> Result<Vec<PathBuf>, ScanError>
where
    P: AsRef<Path>,
{
    if options.depth_limit == Some(0) {
        return Err(ScanError::InvalidDepthLimit(
            "Arg `depth_limit` must be >= 1 or None.".to_string(),
        ));
    }

    let path_dir_src = dir_source.as_ref().to_path_buf();
    if !path_dir_src.is_dir() {
        return Err(ScanError::SourceNotDirectory(path_dir_src));
    }

    let spec_scan_pats = SpecScanPatterns::from_raw(
        options.patterns_include_files.as_deref(),
        options.patterns_exclude_files.as_deref(),
        options.rule_pattern,
    )?;

    let mut l_files = Vec::new();
    walk_directory(&path_dir_src, 1, options, &spec_scan_pats, &mut l_files);
    Ok(l_files)
}

fn is_xml_file(path_file: &Path) -> bool {
    path_file
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(C_EXT_XML))
}

fn walk_directory(
    path_root: &Path,
    n_depth: usize,
    options: &SpecScanOptions,
    spec_scan_pats: &SpecScanPatterns,
    l_files: &mut Vec<PathBuf>,
) {
    let Ok(iter_entries) = fs::read_dir(path_root) else {
        return;
    };

    let mut l_dirs: Vec<(String, PathBuf)> = Vec::new();
    let mut l_xml: Vec<(String, PathBuf)> = Vec::new();

    for entry in iter_entries.flatten() {
        let path_entry = entry.path();
        let c_name = entry.file_name().to_string_lossy().to_string();
        if path_entry.is_dir() {
            l_dirs.push((c_name, path_entry));
        } else if is_xml_file(&path_entry) {
            l_xml.push((c_name, path_entry));
        }
    }

    l_dirs.sort_by(|a, b| a.0.cmp(&b.0));
    l_xml.sort_by(|a, b| a.0.cmp(&b.0));

    for (c_name, path_file) in l_xml {
        if should_exclude_by_patterns(&c_name, spec_scan_pats) {
            continue;
        }
        l_files.push(path_file);
    }

    if options.depth_limit.is_some_and(|limit| n_depth >= limit) {
        return;
    }
    for (_, path_dir_sub) in l_dirs {
        walk_directory(&path_dir_sub, n_depth + 1, options, spec_scan_pats, l_files);
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
