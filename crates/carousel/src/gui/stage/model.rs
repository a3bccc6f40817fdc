use super::{CARD_SIZE, ICON_SIZE};
use crate::config::{Config, ItemConfig, ItemLabel};
use crate::icon;
use gdk_pixbuf::Pixbuf;
use orbit::{Placement, Point};

/// What the carousel last told us about a card.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Visual {
    pub placement: Placement,
    pub stacking_order: i32,
}

impl Visual {
    /// Card center on screen. Only the horizontal offset moves the card; depth
    /// is conveyed through scale, opacity and stacking.
    pub fn center(&self, origin: Point) -> Point {
        Point::new(origin.x + self.placement.offset.x, origin.y)
    }

    pub fn size(&self) -> f64 {
        CARD_SIZE * self.placement.scale
    }

    pub fn contains(&self, origin: Point, point: Point) -> bool {
        let center = self.center(origin);
        let half = self.size() / 2.0;
        half > 0.0 && (point.x - center.x).abs() <= half && (point.y - center.y).abs() <= half
    }
}

#[derive(Clone)]
pub struct Card {
    pub label: ItemLabel,
    pub pixbuf: Option<Pixbuf>,
    pub visual: Visual,
}

impl Card {
    pub fn new(label: ItemLabel, pixbuf: Option<Pixbuf>) -> Self {
        Self {
            label,
            pixbuf,
            visual: Visual::default(),
        }
    }

    pub fn from_config(cfg: &ItemConfig) -> Self {
        let pixbuf = cfg.icon.as_ref().and_then(Self::load_icon);
        Self::new(cfg.label.clone(), pixbuf)
    }

    fn load_icon(name: &icon::IconName) -> Option<Pixbuf> {
        let path = icon::find_icon_path(name)?;
        Pixbuf::from_file_at_scale(&path, ICON_SIZE, ICON_SIZE, true)
            .inspect_err(|e| log::warn!("Failed to load icon {}: {}", path.display(), e))
            .ok()
    }
}

#[derive(Clone, Default)]
pub struct Stage {
    pub cards: Vec<Card>,
}

impl Stage {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.items.iter().map(Card::from_config).collect())
    }

    /// Card indices back to front.
    pub fn draw_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.cards.len()).collect();
        order.sort_by_key(|&i| self.cards[i].visual.stacking_order);
        order
    }

    /// Topmost card under `point`, with `origin` being the circle's center.
    pub fn hit_test(&self, origin: Point, point: Point) -> Option<usize> {
        self.draw_order()
            .into_iter()
            .rev()
            .find(|&i| self.cards[i].visual.contains(origin, point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(label: &str, x: f64, scale: f64, stacking_order: i32) -> Card {
        let mut card = Card::new(ItemLabel::new(label), None);
        card.visual = Visual {
            placement: Placement {
                offset: Point::new(x, 0.0),
                scale,
                opacity: 1.0,
            },
            stacking_order,
        };
        card
    }

    #[test]
    fn test_draw_order_is_back_to_front() {
        let stage = Stage::new(vec![
            card("front", 0.0, 1.0, 10),
            card("back", 0.0, 0.1, 0),
            card("side", 50.0, 0.5, 5),
        ]);
        assert_eq!(stage.draw_order(), vec![1, 2, 0]);
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let origin = Point::new(400.0, 300.0);
        let stage = Stage::new(vec![
            card("front", 0.0, 1.0, 10),
            card("side", 60.0, 0.5, 5),
            card("hidden", 0.0, 0.0, 0),
        ]);

        // Overlap between front and side cards goes to the front one.
        assert_eq!(stage.hit_test(origin, Point::new(450.0, 300.0)), Some(0));
        assert_eq!(stage.hit_test(origin, Point::new(490.0, 300.0)), Some(1));
        assert_eq!(stage.hit_test(origin, Point::new(400.0, 500.0)), None);
    }
}
