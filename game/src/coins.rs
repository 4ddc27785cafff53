/*!
Coin spawning, movement and gathering.

Coins appear at the far edge of the corridor on a random schedule and slide toward -Z.
Each tick, after moving, a coin is either:
- discarded, once it has passed the near edge (checked first);
- gathered, when its ball touches the character's hitbox, adding its points to the score;
- kept, with its physics body moved along.
*/

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::{COIN_RADIUS, COIN_SPAWN_HEIGHT, COIN_SPAWN_INTERVAL_S, COIN_SPEED};
use crate::level::Level;
use crate::physics::{BodyDesc, BodyHandle, ColliderShapeDef, PhysicsWorld};
use crate::score::Score;
use crate::types::{Aabb, Transform, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CoinKind {
    High,
    Mid,
    Low,
}

impl CoinKind {
    pub const ALL: [CoinKind; 3] = [CoinKind::High, CoinKind::Mid, CoinKind::Low];

    pub const fn points(self) -> u32 {
        match self {
            CoinKind::High => 3,
            CoinKind::Mid => 2,
            CoinKind::Low => 1,
        }
    }

    pub const fn model(self) -> &'static str {
        match self {
            CoinKind::High => "Coin_A",
            CoinKind::Mid => "Coin_B",
            CoinKind::Low => "Coin_C",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Coin {
    /// Unique for the lifetime of a manager; hosts key rendered entities on it.
    pub id: u64,
    pub kind: CoinKind,
    pub body: BodyHandle,
    pub position: Vec3,
}

/// What happened to the coins during one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CoinTick {
    pub spawned: usize,
    pub despawned: usize,
    pub gathered: Vec<CoinKind>,
}

#[derive(Clone, Debug, PartialEq)]
struct SpawnArea {
    x: std::ops::RangeInclusive<i32>,
    spawn_z: f32,
    despawn_z: f32,
}

#[derive(Debug)]
pub struct CoinManager {
    coins: Vec<Coin>,
    next_spawn_at: f32,
    next_id: u64,
    area: SpawnArea,
    rng: StdRng,
}

impl CoinManager {
    pub fn new(level: &Level, rng: StdRng) -> Self {
        Self {
            coins: Vec::new(),
            next_spawn_at: 0.0,
            next_id: 0,
            area: SpawnArea {
                x: level.coin_x_range(),
                spawn_z: level.coin_spawn_z(),
                despawn_z: level.coin_despawn_z(),
            },
            rng,
        }
    }

    /// Seeded manager, or one seeded from entropy when `seed` is `None`.
    pub fn with_seed(level: &Level, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(level, rng)
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn next_spawn_at(&self) -> f32 {
        self.next_spawn_at
    }

    fn spawn(&mut self, physics: &mut dyn PhysicsWorld) {
        let kind = CoinKind::ALL[self.rng.gen_range(0..CoinKind::ALL.len())];
        let position = Vec3::new(
            self.rng.gen_range(self.area.x.clone()) as f32,
            self.rng.gen_range(COIN_SPAWN_HEIGHT) as f32,
            self.area.spawn_z,
        );
        let body = physics.create_body(
            BodyDesc::kinematic(
                ColliderShapeDef::Sphere {
                    radius: COIN_RADIUS,
                },
                Transform::from_translation(position),
            )
            .sensor(),
        );
        log::trace!("coin {} ({kind:?}) spawned at {position:?}", self.next_id);
        self.coins.push(Coin {
            id: self.next_id,
            kind,
            body,
            position,
        });
        self.next_id += 1;
    }

    pub fn update(
        &mut self,
        dt: f32,
        elapsed: f32,
        physics: &mut dyn PhysicsWorld,
        hitbox: &Aabb,
        score: &mut Score,
    ) -> CoinTick {
        let mut tick = CoinTick::default();

        if elapsed > self.next_spawn_at {
            self.spawn(physics);
            tick.spawned += 1;
            self.next_spawn_at = elapsed + self.rng.gen_range(COIN_SPAWN_INTERVAL_S);
        }

        let travel = Vec3::new(0.0, 0.0, -COIN_SPEED * dt);
        for mut coin in std::mem::take(&mut self.coins) {
            coin.position += travel;

            if coin.position.z < self.area.despawn_z {
                physics.remove_body(coin.body);
                tick.despawned += 1;
                continue;
            }

            if hitbox.intersects_sphere(&coin.position, COIN_RADIUS) {
                score.increment_by(coin.kind.points());
                physics.remove_body(coin.body);
                log::debug!("gathered {:?} coin worth {}", coin.kind, coin.kind.points());
                tick.gathered.push(coin.kind);
                continue;
            }

            physics.set_translation(coin.body, coin.position);
            self.coins.push(coin);
        }

        tick
    }

    /// Discard every live coin and its physics body.
    pub fn remove(self, physics: &mut dyn PhysicsWorld) {
        log::debug!("removing {} coins", self.coins.len());
        for coin in self.coins {
            physics.remove_body(coin.body);
        }
    }
}
