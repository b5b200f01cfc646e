//! HTML view layer.
//!
//! Templates are compiled into the binary and rendered with minijinja.

use axum::response::Html;
use minijinja::Environment;
use serde::Serialize;

use crate::error::AppResult;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../../templates/layout.html")),
    ("books/index.html", include_str!("../../templates/books/index.html")),
    ("books/form.html", include_str!("../../templates/books/form.html")),
    ("books/new.html", include_str!("../../templates/books/new.html")),
    ("books/edit.html", include_str!("../../templates/books/edit.html")),
];

pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(*name, *source)?;
        }
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> AppResult<Html<String>> {
        let html = self.env.get_template(name)?.render(ctx)?;
        Ok(Html(html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn all_templates_compile() {
        let engine = TemplateEngine::new().unwrap();
        let html = engine
            .render(
                "books/new.html",
                context! { title => "New Book", book => context! {}, errors => Vec::<String>::new() },
            )
            .unwrap();
        assert!(html.0.contains("New Book"));
    }

    #[test]
    fn values_are_escaped() {
        let engine = TemplateEngine::new().unwrap();
        let html = engine
            .render(
                "books/index.html",
                context! {
                    title => "Books",
                    books => vec![context! { id => 1, title => "<b>Bold</b>", author => "A" }],
                    pages => 1,
                    page => 1,
                },
            )
            .unwrap();
        assert!(html.0.contains("&lt;b&gt;Bold&lt;/b&gt;"));
    }
}
