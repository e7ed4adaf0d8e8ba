//! The contract between resolution and file rendering.
//!
//! A [`Template`] turns a fully [`Resolved`] configuration into the text of
//! one output file. Every field a template reads is present and validated
//! before rendering starts, so rendering cannot fail.

use std::path::PathBuf;

use tracing::debug;

use crate::composite::Resolved;

/// One generated file.
pub trait Template {
    /// File name, e.g. `block.json`.
    fn filename(&self) -> String;

    /// Directory relative to the output directory, if not the root.
    fn relative_path(&self) -> Option<PathBuf> {
        None
    }

    /// Render the file contents.
    fn render(&self, resolved: &Resolved) -> String;
}

/// A template built from a name and a render function.
pub struct FnTemplate<F> {
    filename: String,
    relative_path: Option<PathBuf>,
    render: F,
}

impl<F> FnTemplate<F>
where
    F: Fn(&Resolved) -> String,
{
    pub fn new(filename: impl Into<String>, render: F) -> Self {
        Self {
            filename: filename.into(),
            relative_path: None,
            render,
        }
    }

    /// Place the file under `path` inside the output directory.
    pub fn under(mut self, path: impl Into<PathBuf>) -> Self {
        self.relative_path = Some(path.into());
        self
    }
}

impl<F> Template for FnTemplate<F>
where
    F: Fn(&Resolved) -> String,
{
    fn filename(&self) -> String {
        self.filename.clone()
    }

    fn relative_path(&self) -> Option<PathBuf> {
        self.relative_path.clone()
    }

    fn render(&self, resolved: &Resolved) -> String {
        (self.render)(resolved)
    }
}

/// A rendered file and where it belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// Absolute path under the resolved output directory
    pub path: PathBuf,
    pub contents: String,
}

/// Render every template against one resolved configuration.
pub fn render_all(resolved: &Resolved, templates: &[&dyn Template]) -> Vec<RenderedFile> {
    let root = &resolved.core.output_directory;
    templates
        .iter()
        .map(|template| {
            let dir = match template.relative_path() {
                Some(relative) => root.join(relative),
                None => root.clone(),
            };
            let path = dir.join(template.filename());
            debug!(path = %path.display(), "rendering template");
            RenderedFile {
                path,
                contents: template.render(resolved),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::{MinimumInput, Resolver};
    use crate::constants::Constants;

    fn resolved() -> Resolved {
        Resolver::new(Constants::with_working_dir("/srv"))
            .unwrap()
            .builder(MinimumInput::new("my-plugin", "awesome-block", "Awesome"))
            .build()
            .unwrap()
    }

    struct Readme;

    impl Template for Readme {
        fn filename(&self) -> String {
            "readme.txt".to_string()
        }

        fn render(&self, resolved: &Resolved) -> String {
            format!("=== {} ===", resolved.core.title)
        }
    }

    #[test]
    fn test_paths_are_under_output_directory() {
        let resolved = resolved();
        let view = FnTemplate::new("view.js", |r: &Resolved| format!("// {}", r.block.name)).under("src");

        let files = render_all(&resolved, &[&Readme, &view]);
        assert_eq!(files[0].path, PathBuf::from("/srv/awesome-block/readme.txt"));
        assert_eq!(files[0].contents, "=== Awesome ===");
        assert_eq!(files[1].path, PathBuf::from("/srv/awesome-block/src/view.js"));
        assert_eq!(files[1].contents, "// my-plugin/awesome-block");
    }

    #[test]
    fn test_no_templates_renders_nothing() {
        assert!(render_all(&resolved(), &[]).is_empty());
    }
}
