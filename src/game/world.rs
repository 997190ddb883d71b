use crate::game::entities::{Basket, Field, Star};

/// Slack around the basket when testing for a catch; half a star's drawn width.
pub const CATCH_MARGIN: f64 = 15.0;
/// How far below the field a star may fall before it counts as missed.
pub const OFFSCREEN_MARGIN: f64 = 20.0;

/// Region in which a star's anchor point counts as caught.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CatchRegion {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

impl CatchRegion {
    pub fn around(basket: &Basket) -> Self {
        CatchRegion {
            left: basket.x - CATCH_MARGIN,
            right: basket.x + basket.width + CATCH_MARGIN,
            top: basket.y - CATCH_MARGIN,
            bottom: basket.y + basket.height,
        }
    }

    /// Horizontal bounds are inclusive; the bottom edge is exclusive.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y < self.bottom
    }
}

#[derive(Debug, Default)]
pub struct StarsOutcome {
    pub stars: Vec<Star>,
    pub caught: u32,
    pub missed: u32,
}

/// Advance every star one tick, then split them into kept, caught and missed.
///
/// Each star is judged against the same basket, so the result does not depend
/// on iteration order.
pub fn update_stars(stars: Vec<Star>, basket: &Basket, field: Field) -> StarsOutcome {
    let region = CatchRegion::around(basket);
    let floor = field.height + OFFSCREEN_MARGIN;

    let mut outcome = StarsOutcome {
        stars: Vec::with_capacity(stars.len()),
        ..Default::default()
    };
    for star in stars.into_iter().map(Star::fallen) {
        if region.contains(star.x, star.y) {
            outcome.caught += 1;
        } else if star.y > floor {
            outcome.missed += 1;
        } else {
            outcome.stars.push(star);
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::STAR_SIZE;

    fn star(x: f64, y: f64, speed: f64) -> Star {
        Star { x, y, size: STAR_SIZE, speed }
    }

    #[test]
    fn star_inside_region_is_caught() {
        let field = Field::default();
        let basket = Basket::centered(field);
        let out = update_stars(vec![star(basket.x + 10.0, basket.y - 2.0, 2.0)], &basket, field);
        assert_eq!(out.caught, 1);
        assert_eq!(out.missed, 0);
        assert!(out.stars.is_empty());
    }

    #[test]
    fn catch_edges() {
        let field = Field::default();
        let basket = Basket::centered(field);
        let region = CatchRegion::around(&basket);
        assert!(region.contains(basket.x - CATCH_MARGIN, basket.y));
        assert!(region.contains(basket.x + basket.width + CATCH_MARGIN, basket.y));
        assert!(region.contains(basket.x, basket.y - CATCH_MARGIN));
        assert!(!region.contains(basket.x, basket.y + basket.height));
        assert!(!region.contains(basket.x - CATCH_MARGIN - 0.1, basket.y));
    }

    #[test]
    fn star_below_field_is_missed() {
        let field = Field::default();
        let mut basket = Basket::centered(field);
        basket.x = 0.0;
        let out = update_stars(vec![star(700.0, field.height + 19.0, 2.0)], &basket, field);
        assert_eq!(out.caught, 0);
        assert_eq!(out.missed, 1);
        assert!(out.stars.is_empty());
    }

    #[test]
    fn star_at_floor_is_kept() {
        let field = Field::default();
        let mut basket = Basket::centered(field);
        basket.x = 0.0;
        let out = update_stars(vec![star(700.0, field.height + 18.0, 2.0)], &basket, field);
        assert_eq!(out.missed, 0);
        assert_eq!(out.stars.len(), 1);
    }

    #[test]
    fn free_stars_keep_falling_in_order() {
        let field = Field::default();
        let basket = Basket::centered(field);
        let out = update_stars(
            vec![star(10.0, 0.0, 2.0), star(20.0, 5.0, 3.0)],
            &basket,
            field,
        );
        assert_eq!(out.stars, vec![star(10.0, 2.0, 2.0), star(20.0, 8.0, 3.0)]);
    }

    #[test]
    fn adjacent_catches_are_all_counted() {
        let field = Field::default();
        let basket = Basket::centered(field);
        let y = basket.y;
        let stars = vec![
            star(basket.x, y, 1.0),
            star(basket.x + 20.0, y, 1.0),
            star(5.0, 100.0, 1.0),
            star(basket.x + 40.0, y, 1.0),
            star(5.0, field.height + 25.0, 1.0),
        ];
        let out = update_stars(stars.clone(), &basket, field);
        assert_eq!(out.caught, 3);
        assert_eq!(out.missed, 1);
        assert_eq!(out.stars.len(), 1);

        let mut reversed = stars;
        reversed.reverse();
        let out_rev = update_stars(reversed, &basket, field);
        assert_eq!(out_rev.caught, out.caught);
        assert_eq!(out_rev.missed, out.missed);
    }

    #[test]
    fn caught_star_is_never_also_missed() {
        // A basket level with the floor: the star is past the floor and inside the region.
        let field = Field { width: 800.0, height: 600.0 };
        let basket = Basket { x: 0.0, y: 610.0, width: 80.0, height: 40.0, speed: 8.0 };
        let out = update_stars(vec![star(40.0, 620.0, 5.0)], &basket, field);
        assert_eq!((out.caught, out.missed), (1, 0));
    }
}
