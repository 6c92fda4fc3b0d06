//! Criterion benchmarks for full-game simulation and ball flight.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bb_core::engine::trajectory::fly;
use bb_core::models::{
    BattedBallDescriptor, PitcherRole, Player, PlayerId, Position, TeamSheet,
};
use bb_core::{GameEngine, GamePlan, ParkGeometry, Weather};

const FIELD: [Position; 9] = [
    Position::CF,
    Position::SS,
    Position::FirstBase,
    Position::LF,
    Position::RF,
    Position::ThirdBase,
    Position::SecondBase,
    Position::C,
    Position::DH,
];

fn team(name: &str, id_base: PlayerId) -> TeamSheet {
    let mut players: Vec<Player> = FIELD
        .iter()
        .enumerate()
        .map(|(i, &pos)| Player::new(id_base + i as PlayerId, format!("{name} {i}"), pos))
        .collect();
    for (i, role) in [PitcherRole::Starter, PitcherRole::Reliever, PitcherRole::Reliever, PitcherRole::Closer]
        .into_iter()
        .enumerate()
    {
        players.push(Player::new(id_base + 9 + i as PlayerId, format!("{name} P{i}"), Position::P).with_role(role));
    }
    TeamSheet { name: name.to_string(), players, lineup: (0..9).collect(), starting_pitcher: 9 }
}

fn bench_full_game(c: &mut Criterion) {
    let home = team("Home", 100);
    let away = team("Away", 200);
    let mut seed = 0u64;
    c.bench_function("full_game", |b| {
        b.iter(|| {
            seed = seed.wrapping_add(1);
            let engine = GameEngine::new(GamePlan::new(seed, home.clone(), away.clone()))
                .expect("valid plan");
            black_box(engine.run())
        })
    });
}

fn bench_flight(c: &mut Criterion) {
    let weather = Weather::default();
    let park = ParkGeometry::default();
    let ball = BattedBallDescriptor::new(165.0, 27.0, 10.0, 2400.0, 180.0, 0.8);
    c.bench_function("fly_ball_flight", |b| b.iter(|| black_box(fly(black_box(&ball), &weather, &park))));
}

criterion_group!(benches, bench_full_game, bench_flight);
criterion_main!(benches);
