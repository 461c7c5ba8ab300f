use serde::Serialize;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait TemplateService: Send + Sync + 'static {
    /// Render both variants of the given template.
    fn render<T: Template + 'static>(&self, template: &T) -> anyhow::Result<RenderedEmail>;
}

#[cfg(feature = "mock")]
impl MockTemplateService {
    pub fn with_render<T: Template + Send + PartialEq + std::fmt::Debug + 'static>(
        mut self,
        template: T,
        result: RenderedEmail,
    ) -> Self {
        self.expect_render()
            .once()
            .with(mockall::predicate::eq(template))
            .return_once(|_| Ok(result));
        self
    }
}

/// An email template with an html and a plain text variant. The two are
/// rendered from the same context and sent together as a multipart message.
pub trait Template: Serialize {
    const NAME: &'static str;
    const HTML: &'static str;
    const TEXT: &'static str;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub html: String,
    pub text: String,
}

macro_rules! templates {
    ($( $ident:ident ( $name:literal ), )* ) => {
        $(
            impl Template for $ident {
                const NAME: &'static str = $name;
                const HTML: &'static str =
                    include_str!(concat!("../templates/", $name, ".html"));
                const TEXT: &'static str =
                    include_str!(concat!("../templates/", $name, ".txt"));
            }
        )*

        pub const TEMPLATES: &[(&str, &str, &str)] = &[
            $( ($ident::NAME, $ident::HTML, $ident::TEXT) ),*
        ];
    };
}

templates! {
    InquiryTemplate("inquiry"),
}

/// Context for the email sent to the operator for each contact form
/// submission. `service` is the resolved label, not the wire code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InquiryTemplate {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub service: String,
    pub message: Option<String>,
}
