#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use xyards_model::config::{ModelConfig, ModelType, TrainerConfig};
use xyards_model::data::{PlayParticipants, PlayRecord, PlaySituation, PlayType};
use xyards_model::model::ModelArtifact;
use xyards_model::train::train;

pub const FORMATIONS: [&str; 4] = ["SHOTGUN", "SINGLEBACK", "I_FORM", "EMPTY"];
pub const PERSONNEL: [&str; 3] = ["1 RB, 1 TE, 3 WR", "1 RB, 2 TE, 2 WR", "2 RB, 1 TE, 2 WR"];

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Plays where passing gains more than running, shotgun adds a little and
/// short distances shrink gains.
pub fn synthetic_plays(n: usize, seed: u64) -> Vec<PlayRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let down = rng.gen_range(1..=4u8);
            let distance = rng.gen_range(1..=15) as f32;
            let yardline = rng.gen_range(5..=95) as f32;
            let play_type = if rng.gen_bool(0.55) { PlayType::Pass } else { PlayType::Run };
            let formation = FORMATIONS[rng.gen_range(0..FORMATIONS.len())];
            let personnel = PERSONNEL[rng.gen_range(0..PERSONNEL.len())];

            let mut yards = match play_type {
                PlayType::Pass => 7.0,
                PlayType::Run => 4.0,
            };
            if formation == "SHOTGUN" {
                yards += 1.0;
            }
            yards += (distance - 8.0) * 0.2 + rng.gen_range(-2.0..2.0);

            let situation = PlaySituation::new(down, distance, yardline)
                .with_play_type(play_type)
                .with_formation(formation)
                .with_personnel(personnel)
                .with_quarter(rng.gen_range(1..=4))
                .with_score_differential(rng.gen_range(-14..=14) as f32)
                .with_seconds_remaining(rng.gen_range(0..=3600) as f32);
            let mut record = PlayRecord::new(situation, yards);
            record.participants = PlayParticipants {
                posteam: Some(if i % 2 == 0 { "KC" } else { "BUF" }.to_string()),
                rusher: (play_type == PlayType::Run).then(|| format!("R.Back{}", i % 3)),
                receiver: (play_type == PlayType::Pass).then(|| format!("W.Out{}", i % 4)),
            };
            record
        })
        .collect()
}

pub fn quick_config() -> TrainerConfig {
    TrainerConfig {
        model: ModelConfig::new(
            0.2,
            ModelType::GBDT {
                max_depth: 4,
                num_boost_round: 30,
                min_leaf_size: 2,
                debug: false,
                training_optimization_level: 2,
                loss_type: "SquaredError".to_string(),
            },
        ),
        ..TrainerConfig::default()
    }
}

pub fn trained_artifact() -> ModelArtifact {
    train(&synthetic_plays(300, 7), &quick_config()).expect("training succeeds")
}
