//! Element path resolution.
//!
//! A request names a category, a class and optionally an element. The file
//! stem searched for is `"<class> <element>"`, or just `"<class>"` when no
//! element is given. Each theme of the chain is probed in order:
//!
//! ```text
//! Themes/neon/Graphics/ScreenTitleMenu logo.png      <- wins if present
//! Themes/default/Graphics/ScreenTitleMenu logo.png
//! ```
//!
//! Within one directory the category's extension order decides between
//! candidates. The first theme holding any candidate wins, even when a later
//! theme has a more preferred extension.
//!
//! Classes degrade the way metric classes do. Inside each theme the stem for
//! `ScreenGameplay::P1 life` is tried before `ScreenGameplay life`, and only
//! then is the next theme probed.
//!
//! A `.redir` file names another stem to use instead. The redirect target is
//! resolved through the whole chain again.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::category::{ElementCategory, REDIRECT_EXTENSION};
use crate::error::{ThemeError, ThemeResult};
use crate::metrics::{ThemeLayer, degraded_classes};

/// A request for one element of a theme.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathRequest {
    pub category: ElementCategory,
    pub class: String,
    pub element: String,
    pub optional: bool,
}

impl PathRequest {
    pub fn new(category: ElementCategory, class: impl Into<String>, element: impl Into<String>) -> Self {
        Self {
            category,
            class: class.into(),
            element: element.into(),
            optional: false,
        }
    }

    /// Missing elements resolve to `None` instead of an error.
    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Build a request from a bare `"Class element"` file name.
    pub fn from_file_name(category: ElementCategory, file_name: &str) -> Self {
        let (class, element) = file_name.split_once(' ').unwrap_or((file_name, ""));
        Self::new(category, class, element)
    }

    /// The element name, or the class when no element was given.
    pub fn effective_element(&self) -> &str {
        if self.element.is_empty() {
            &self.class
        } else {
            &self.element
        }
    }

    pub fn file_stem(&self) -> String {
        if self.element.is_empty() {
            self.class.clone()
        } else {
            format!("{} {}", self.class, self.element)
        }
    }

    /// Stems to probe in each theme, for the class and then every degraded
    /// class.
    pub fn candidate_stems(&self) -> Vec<String> {
        degraded_classes(&self.class)
            .map(|class| {
                if self.element.is_empty() {
                    class.to_string()
                } else {
                    format!("{class} {}", self.element)
                }
            })
            .collect()
    }

    pub(crate) fn not_found(&self, chain: Vec<String>) -> ThemeError {
        ThemeError::PathNotFound {
            category: self.category,
            class: self.class.clone(),
            element: self.element.clone(),
            chain,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Candidate {
    Element(PathBuf),
    Redirect(PathBuf),
}

/// Resolves path requests against the layers of a fallback chain.
pub struct PathResolver<'a> {
    layers: &'a [ThemeLayer],
}

impl<'a> PathResolver<'a> {
    pub fn new(layers: &'a [ThemeLayer]) -> Self {
        Self { layers }
    }

    pub fn resolve(&self, request: &PathRequest) -> ThemeResult<Option<PathBuf>> {
        match self.find(request)? {
            Some(path) => Ok(Some(path)),
            None if request.optional => {
                log::debug!("Optional {} element '{}' not found", request.category, request.file_stem());
                Ok(None)
            }
            None => Err(request.not_found(self.layers.iter().map(|l| l.name.clone()).collect())),
        }
    }

    /// First element for `request` in the chain, degrading its class within
    /// each theme and following redirects.
    pub fn find(&self, request: &PathRequest) -> ThemeResult<Option<PathBuf>> {
        self.find_first(request.category, request.candidate_stems())
    }

    fn find_first(&self, category: ElementCategory, mut stems: Vec<String>) -> ThemeResult<Option<PathBuf>> {
        let mut visited: Vec<String> = Vec::new();

        loop {
            let found = self.layers.iter().find_map(|layer| {
                let dir = layer.dir.join(category.dir_name());
                stems.iter().find_map(|stem| {
                    probe_dir(&dir, category, stem).map(|candidate| (layer, stem.clone(), candidate))
                })
            });

            match found {
                None => return Ok(None),
                Some((layer, stem, Candidate::Element(path))) => {
                    log::debug!("{category} '{stem}' resolved in theme {} to {}", layer.name, path.display());
                    return Ok(Some(path));
                }
                Some((layer, stem, Candidate::Redirect(path))) => {
                    let target = read_redirect(&path)?;
                    if target.is_empty() {
                        log::warn!("Empty redirect {} in theme {}", path.display(), layer.name);
                        return Ok(None);
                    }
                    if visited.is_empty() {
                        visited.push(stem.clone());
                    }
                    let looped = visited.iter().any(|v| v.eq_ignore_ascii_case(&target));
                    visited.push(target.clone());
                    if looped {
                        return Err(ThemeError::RedirectCycle {
                            category,
                            stems: visited,
                        });
                    }
                    log::debug!("{category} '{stem}' redirected to '{target}' by theme {}", layer.name);
                    stems = vec![target];
                }
            }
        }
    }
}

fn read_redirect(path: &Path) -> ThemeResult<String> {
    let text = fs::read_to_string(path).map_err(|e| ThemeError::io(path, e))?;
    Ok(text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string())
}

/// Best candidate for `stem` inside one category directory.
fn probe_dir(dir: &Path, category: ElementCategory, stem: &str) -> Option<Candidate> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            if e.kind() != ErrorKind::NotFound {
                log::warn!("Failed to read {}: {e}", dir.display());
            }
            return None;
        }
    };

    let stem = stem.to_lowercase();
    let mut best: Option<(usize, String, Candidate)> = None;

    for entry in entries.filter_map(|e| e.ok()) {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let lower = name.to_lowercase();
        let Some(rest) = lower.strip_prefix(&stem) else {
            continue;
        };

        let path = entry.path();
        let ranked = if path.is_dir() {
            (category.allows_directories() && rest.is_empty()).then(|| (0, Candidate::Element(path)))
        } else {
            match_file_suffix(category, rest).map(|(rank, redirect)| {
                let candidate = if redirect {
                    Candidate::Redirect(path)
                } else {
                    Candidate::Element(path)
                };
                (rank, candidate)
            })
        };

        if let Some((rank, candidate)) = ranked {
            let better = match &best {
                Some((best_rank, best_name, _)) => (rank, &lower) < (*best_rank, best_name),
                None => true,
            };
            if better {
                best = Some((rank, lower.clone(), candidate));
            }
        }
    }

    best.map(|(_, _, candidate)| candidate)
}

/// Rank of a file whose name is the stem followed by `rest`, and whether it
/// is a redirect. Directories take rank 0, files start at 1.
fn match_file_suffix(category: ElementCategory, rest: &str) -> Option<(usize, bool)> {
    if rest.is_empty() {
        // Other takes any file, even one without an extension
        return (category == ElementCategory::Other).then_some((1, false));
    }

    if let Some(extension) = rest.strip_prefix('.') {
        if extension.is_empty() || extension.contains('.') {
            return None;
        }
        if extension.eq_ignore_ascii_case(REDIRECT_EXTENSION) {
            return Some((usize::MAX, true));
        }
        return category.extension_rank(extension).map(|rank| (rank + 1, false));
    }

    if category.allows_page_suffix() && rest.starts_with(' ') {
        let (pages, extension) = rest.rsplit_once('.')?;
        if is_page_suffix(pages) {
            return category.extension_rank(extension).map(|rank| (rank + 1, false));
        }
    }

    None
}

/// Optional `[page]` tokens followed by exactly one dimensions token, as in
/// `" [alt] 16x16"`. Anything else after the stem names another element.
fn is_page_suffix(pages: &str) -> bool {
    let mut tokens: Vec<&str> = pages.split_whitespace().collect();
    let Some(dimensions) = tokens.pop() else {
        return false;
    };
    is_page_spec(dimensions)
        && tokens
            .iter()
            .all(|token| token.len() > 2 && token.starts_with('[') && token.ends_with(']'))
}

/// `16x16`-style texture page dimensions.
fn is_page_spec(token: &str) -> bool {
    token.split_once('x').is_some_and(|(w, h)| {
        !w.is_empty()
            && !h.is_empty()
            && w.chars().all(|c| c.is_ascii_digit())
            && h.chars().all(|c| c.is_ascii_digit())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ini::IniFile;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn layers(root: &Path, names: &[&str]) -> Vec<ThemeLayer> {
        names
            .iter()
            .map(|n| ThemeLayer::new(*n, root.join(n), IniFile::new()))
            .collect()
    }

    #[test]
    fn test_request_stem_and_effective_element() {
        let request = PathRequest::new(ElementCategory::Graphics, "ScreenTitleMenu", "logo");
        assert_eq!(request.file_stem(), "ScreenTitleMenu logo");
        assert_eq!(request.effective_element(), "logo");

        let request = PathRequest::new(ElementCategory::Graphics, "ScreenLogo", "");
        assert_eq!(request.file_stem(), "ScreenLogo");
        assert_eq!(request.effective_element(), "ScreenLogo");
    }

    #[test]
    fn test_from_file_name_splits_first_space() {
        let request = PathRequest::from_file_name(ElementCategory::Sounds, "ScreenTitleMenu change music");
        assert_eq!(request.class, "ScreenTitleMenu");
        assert_eq!(request.element, "change music");
        assert_eq!(request.file_stem(), "ScreenTitleMenu change music");
    }

    #[test]
    fn test_extension_order_within_theme() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "t/Graphics/Foo bar.xml");
        touch(dir.path(), "t/Graphics/Foo bar.png");
        let layers = layers(dir.path(), &["t"]);
        let path = PathResolver::new(&layers)
            .resolve(&PathRequest::new(ElementCategory::Graphics, "Foo", "bar"))
            .unwrap()
            .unwrap();
        assert!(path.ends_with("Foo bar.png"));
    }

    #[test]
    fn test_first_theme_wins_over_better_extension() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "child/Graphics/Foo bar.xml");
        touch(dir.path(), "root/Graphics/Foo bar.png");
        let layers = layers(dir.path(), &["child", "root"]);
        let path = PathResolver::new(&layers)
            .resolve(&PathRequest::new(ElementCategory::Graphics, "Foo", "bar"))
            .unwrap()
            .unwrap();
        assert!(path.starts_with(dir.path().join("child")));
    }

    #[test]
    fn test_stem_must_end_at_boundary() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "t/Graphics/Foo barn.png");
        touch(dir.path(), "t/Graphics/Foo bar extra.png");
        let layers = layers(dir.path(), &["t"]);
        let found = PathResolver::new(&layers)
            .resolve(&PathRequest::new(ElementCategory::Graphics, "Foo", "bar").optional(true))
            .unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_matching_ignores_case() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "t/Sounds/screentitlemenu START.OGG");
        let layers = layers(dir.path(), &["t"]);
        let found = PathResolver::new(&layers)
            .resolve(&PathRequest::new(ElementCategory::Sounds, "ScreenTitleMenu", "start"))
            .unwrap();
        assert!(found.is_some());
    }

    #[test]
    fn test_font_pages() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "t/Fonts/_big 16x16.png");
        let layers = layers(dir.path(), &["t"]);
        let resolver = PathResolver::new(&layers);
        let path = resolver
            .resolve(&PathRequest::new(ElementCategory::Fonts, "_big", ""))
            .unwrap()
            .unwrap();
        assert!(path.ends_with("_big 16x16.png"));

        // A page suffix is not a wildcard for graphics
        touch(dir.path(), "t/Graphics/_big 16x16.png");
        let found = resolver
            .resolve(&PathRequest::new(ElementCategory::Graphics, "_big", "").optional(true))
            .unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_font_pages_do_not_match_longer_names() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "t/Fonts/_big numbers 16x16.png");
        touch(dir.path(), "t/Numbers/_score 16x16 16x16.png");
        let layers = layers(dir.path(), &["t"]);
        let resolver = PathResolver::new(&layers);

        let found = resolver
            .resolve(&PathRequest::new(ElementCategory::Fonts, "_big", "").optional(true))
            .unwrap();
        assert_eq!(found, None);
        let found = resolver
            .resolve(&PathRequest::new(ElementCategory::Numbers, "_score", "").optional(true))
            .unwrap();
        assert_eq!(found, None);

        touch(dir.path(), "t/Fonts/_big [alt] 16x16.png");
        let path = resolver
            .resolve(&PathRequest::new(ElementCategory::Fonts, "_big", ""))
            .unwrap()
            .unwrap();
        assert!(path.ends_with("_big [alt] 16x16.png"));
    }

    #[test]
    fn test_other_accepts_file_without_extension() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "t/Other/ReadMe");
        touch(dir.path(), "t/Graphics/ReadMe");
        let layers = layers(dir.path(), &["t"]);
        let resolver = PathResolver::new(&layers);

        let path = resolver
            .resolve(&PathRequest::new(ElementCategory::Other, "ReadMe", ""))
            .unwrap()
            .unwrap();
        assert!(path.ends_with("Other/ReadMe"));
        let found = resolver
            .resolve(&PathRequest::new(ElementCategory::Graphics, "ReadMe", "").optional(true))
            .unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_class_degrades_within_theme_first() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "child/Graphics/ScreenGameplay life.png");
        touch(dir.path(), "root/Graphics/ScreenGameplay::P1 life.png");
        let layers = layers(dir.path(), &["child", "root"]);
        let resolver = PathResolver::new(&layers);

        let request = PathRequest::new(ElementCategory::Graphics, "ScreenGameplay::P1", "life");
        assert_eq!(request.candidate_stems(), ["ScreenGameplay::P1 life", "ScreenGameplay life"]);
        let path = resolver.resolve(&request).unwrap().unwrap();
        assert!(path.starts_with(dir.path().join("child")));
        assert!(path.ends_with("ScreenGameplay life.png"));

        // The exact class still wins inside the same theme
        touch(dir.path(), "child/Graphics/ScreenGameplay::P1 life.png");
        let path = resolver.resolve(&request).unwrap().unwrap();
        assert!(path.ends_with("ScreenGameplay::P1 life.png"));
    }

    #[test]
    fn test_bganimation_directory_preferred() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "t/BGAnimations/ScreenTitleMenu background/default.xml");
        touch(dir.path(), "t/BGAnimations/ScreenTitleMenu background.png");
        let layers = layers(dir.path(), &["t"]);
        let path = PathResolver::new(&layers)
            .resolve(&PathRequest::new(ElementCategory::BGAnimations, "ScreenTitleMenu", "background"))
            .unwrap()
            .unwrap();
        assert!(path.is_dir());
    }

    #[test]
    fn test_required_miss_reports_chain() {
        let dir = TempDir::new().unwrap();
        let layers = layers(dir.path(), &["child", "root"]);
        let err = PathResolver::new(&layers)
            .resolve(&PathRequest::new(ElementCategory::Graphics, "Foo", "bar"))
            .unwrap_err();
        match err {
            ThemeError::PathNotFound {
                category,
                class,
                element,
                chain,
            } => {
                assert_eq!(category, ElementCategory::Graphics);
                assert_eq!(class, "Foo");
                assert_eq!(element, "bar");
                assert_eq!(chain, ["child", "root"]);
            }
            other => panic!("expected PathNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_redirect_followed_through_chain() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("child/Graphics")).unwrap();
        fs::write(dir.path().join("child/Graphics/Foo bar.redir"), "Shared frame\n").unwrap();
        touch(dir.path(), "root/Graphics/Shared frame.png");
        let layers = layers(dir.path(), &["child", "root"]);
        let path = PathResolver::new(&layers)
            .resolve(&PathRequest::new(ElementCategory::Graphics, "Foo", "bar"))
            .unwrap()
            .unwrap();
        assert!(path.ends_with("Shared frame.png"));
    }

    #[test]
    fn test_redirect_loop() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("t/Graphics")).unwrap();
        fs::write(dir.path().join("t/Graphics/A.redir"), "B").unwrap();
        fs::write(dir.path().join("t/Graphics/B.redir"), "A").unwrap();
        let layers = layers(dir.path(), &["t"]);
        let err = PathResolver::new(&layers)
            .resolve(&PathRequest::new(ElementCategory::Graphics, "A", ""))
            .unwrap_err();
        assert!(matches!(err, ThemeError::RedirectCycle { ref stems, .. } if stems == &["A", "B", "A"]));
    }

    #[test]
    fn test_page_spec() {
        assert!(is_page_spec("16x16"));
        assert!(is_page_spec("8x2"));
        assert!(is_page_suffix(" 16x16"));
        assert!(is_page_suffix(" [p2] 8x8"));
        assert!(!is_page_suffix(" numbers 16x16"));
        assert!(!is_page_suffix(" 16x16 16x16"));
        assert!(!is_page_spec("x16"));
        assert!(!is_page_spec("big"));
    }
}
