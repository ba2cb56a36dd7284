//! Sticker placement and paper skin.

use rand::Rng;

use super::config::{PlacementBounds, SkinPolicy};
use crate::domain::{Message, Placement};

/// Computes presentation state for a new sticker
#[derive(Debug, Clone)]
pub struct StickerPlacer {
    bounds: PlacementBounds,
    skin_count: u8,
    skin_policy: SkinPolicy,
}

impl StickerPlacer {
    pub fn new(bounds: PlacementBounds, skin_count: u8, skin_policy: SkinPolicy) -> Self {
        Self {
            bounds,
            skin_count: skin_count.max(1),
            skin_policy,
        }
    }

    /// Random position within the safe area and a small random tilt
    pub fn place<R: Rng + ?Sized>(&self, rng: &mut R) -> Placement {
        Placement {
            x: self.bounds.margin + rng.gen_range(0.0..=self.bounds.span),
            y: self.bounds.margin + rng.gen_range(0.0..=self.bounds.span),
            rotation: rng.gen_range(-self.bounds.max_rotation..=self.bounds.max_rotation),
        }
    }

    /// Paper skin in `1..=skin_count`
    pub fn skin<R: Rng + ?Sized>(&self, rng: &mut R, message: &Message) -> u8 {
        match self.skin_policy {
            SkinPolicy::Random => rng.gen_range(1..=self.skin_count),
            SkinPolicy::FromMessageId => skin_for_id(message.id.as_str(), self.skin_count),
        }
    }
}

/// Sum of the ID's code points, folded into `1..=skin_count`
pub fn skin_for_id(id: &str, skin_count: u8) -> u8 {
    let count = u32::from(skin_count.max(1));
    let sum = id.chars().fold(0u32, |acc, c| acc.wrapping_add(c as u32));
    // sum % count < count <= u8::MAX
    (sum % count) as u8 + 1
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::domain::{MessageId, Timestamp};

    #[test]
    fn test_placement_stays_inside_safe_area() {
        // テスト項目: 位置と回転が常に安全領域内に収まる
        // given (前提条件):
        let placer = StickerPlacer::new(PlacementBounds::default(), 6, SkinPolicy::Random);
        let mut rng = StdRng::seed_from_u64(3);

        // when (操作):
        let placements: Vec<Placement> = (0..200).map(|_| placer.place(&mut rng)).collect();

        // then (期待する結果):
        for p in placements {
            assert!((10.0..=70.0).contains(&p.x), "x out of range: {}", p.x);
            assert!((10.0..=70.0).contains(&p.y), "y out of range: {}", p.y);
            assert!((-15.0..=15.0).contains(&p.rotation), "rotation out of range: {}", p.rotation);
        }
    }

    #[test]
    fn test_random_skin_in_range() {
        // テスト項目: ランダムなスキンは 1..=skin_count に収まる
        // given (前提条件):
        let placer = StickerPlacer::new(PlacementBounds::default(), 6, SkinPolicy::Random);
        let message = Message::new(MessageId::new("a").unwrap(), "a", Timestamp::new(0));
        let mut rng = StdRng::seed_from_u64(11);

        // when (操作):
        let skins: Vec<u8> = (0..100).map(|_| placer.skin(&mut rng, &message)).collect();

        // then (期待する結果):
        assert!(skins.iter().all(|s| (1..=6).contains(s)));
    }

    #[test]
    fn test_skin_from_message_id_is_stable() {
        // テスト項目: ID 由来のスキンは同じ ID に対して常に同じ
        // given (前提条件):
        let placer = StickerPlacer::new(PlacementBounds::default(), 6, SkinPolicy::FromMessageId);
        let message = Message::new(MessageId::new("abc").unwrap(), "x", Timestamp::new(0));
        let mut rng = StdRng::seed_from_u64(5);

        // when (操作):
        let first = placer.skin(&mut rng, &message);
        let second = placer.skin(&mut rng, &message);

        // then (期待する結果):
        // 'a' + 'b' + 'c' = 294, 294 % 6 = 0
        assert_eq!(first, 1);
        assert_eq!(first, second);
    }
}
