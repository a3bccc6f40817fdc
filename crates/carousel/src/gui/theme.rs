use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct ThemeColors {
    pub card: Srgba<f64>,
    pub main_card: Srgba<f64>,
    pub outline: Srgba<f64>,
    pub label: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            card: Self::lookup_color(
                context,
                "theme_bg_color",
                Srgba::new(0.15, 0.15, 0.15, 0.95),
                Some(0.95),
            ),
            main_card: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                Srgba::new(0.4, 0.4, 0.8, 0.95),
                Some(0.95),
            ),
            outline: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.8, 0.8, 0.8, 0.25),
                Some(0.25),
            ),
            label: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(1.0, 1.0, 1.0, 1.0),
                None,
            ),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.carousel-stage {
    background: none;
    background-color: transparent;
}
.carousel-controls button {
    min-width: 48px;
    min-height: 48px;
    border-radius: 24px;
    font-size: 20px;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
