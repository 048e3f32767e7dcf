use metafetch_core::BookCard;
use minijinja::Environment;

const CARD: &str = "card";

pub const DEFAULT_CARD_TEMPLATE: &str = "\
[{{ id }}] {{ title }}{% if series %} ({{ series }}){% endif %}
    {{ authors }}{% if publisher %} / {{ publisher }}{% endif %}{% if published_date %} / {{ published_date }}{% endif %}
    rating {{ rating }} | {{ source_name }} | {{ url }}
{%- if tags %}
    tags: {{ tags | join(\", \") }}
{%- endif %}";

/// Renders one result card. The template source is checked once at
/// construction so a broken override fails at startup.
#[derive(Debug, Clone)]
pub struct CardTemplate {
    source: String,
}

impl Default for CardTemplate {
    fn default() -> Self {
        Self {
            source: DEFAULT_CARD_TEMPLATE.to_string(),
        }
    }
}

impl CardTemplate {
    pub fn new(source: Option<String>) -> Result<Self, minijinja::Error> {
        let template = match source {
            Some(source) => Self { source },
            None => Self::default(),
        };
        template.environment()?;
        Ok(template)
    }

    pub fn render(&self, card: &BookCard) -> Result<String, minijinja::Error> {
        let env = self.environment()?;
        env.get_template(CARD)?.render(card)
    }

    fn environment(&self) -> Result<Environment<'_>, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(CARD, &self.source)?;
        Ok(env)
    }
}
