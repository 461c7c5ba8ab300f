use std::sync::Arc;

use mwood_templates_contracts::{RenderedEmail, Template, TemplateService, TEMPLATES};
use tera::Tera;

#[derive(Debug, Clone)]
pub struct TemplateServiceImpl {
    tera: Arc<Tera>,
}

impl Default for TemplateServiceImpl {
    fn default() -> Self {
        let mut tera = Tera::default();

        // html variants are autoescaped via the name suffix, text variants
        // are rendered verbatim
        for &(name, html, text) in TEMPLATES {
            tera.add_raw_template(&format!("{name}.html"), html).unwrap();
            tera.add_raw_template(&format!("{name}.txt"), text).unwrap();
        }

        Self { tera: tera.into() }
    }
}

impl TemplateService for TemplateServiceImpl {
    fn render<T: Template>(&self, template: &T) -> anyhow::Result<RenderedEmail> {
        let context = tera::Context::from_serialize(template)?;
        Ok(RenderedEmail {
            html: self.tera.render(&format!("{}.html", T::NAME), &context)?,
            text: self.tera.render(&format!("{}.txt", T::NAME), &context)?,
        })
    }
}
