use gridworld::{
    Action, AgentId, Color, EnvError, MultiAgentEnv, NormConfig, NormEnv, Position, Tile,
};
use std::collections::BTreeMap;

fn env_with_layout(layout: &[&str], num_agents: usize) -> NormEnv {
    let config = NormConfig {
        num_agents,
        layout: Some(layout.iter().map(|r| (*r).to_string()).collect()),
        regrowth_steps: 2,
        ..NormConfig::default()
    };
    NormEnv::new(config).unwrap()
}

fn actions(list: &[Action]) -> BTreeMap<AgentId, Action> {
    list.iter().enumerate().map(|(i, &a)| (AgentId(i), a)).collect()
}

#[test]
fn reset_places_agents_on_spawn_points() {
    let mut env = NormEnv::new(NormConfig::default()).unwrap();
    let obs = env.reset();
    assert_eq!(obs.len(), 2);
    assert_eq!(env.agent_ids(), vec![AgentId(0), AgentId(1)]);
    assert_eq!(env.agents()[0].pos, Position::new(1, 1));
    assert_eq!(env.agents()[1].pos, Position::new(6, 14));
    assert_eq!(env.grid().get(Position::new(1, 1)), Some(Tile::Agent(AgentId(0))));
    assert_eq!(env.action_space(), 4);
}

#[test]
fn observation_and_frame_dimensions() {
    let env = NormEnv::new(NormConfig::default()).unwrap();
    let frame = env.map_to_colors();
    assert_eq!((frame.width(), frame.height()), (16, 8));
    assert_eq!(*frame.get_pixel(0, 0), gridworld::palette::WALL);

    let mut env = env;
    let obs = env.reset();
    let view = &obs[&AgentId(0)];
    assert_eq!((view.width(), view.height()), (7, 7));
    assert_eq!(*view.get_pixel(3, 3), gridworld::palette::agent(AgentId(0)));
    // Agent 0 sits at (1, 1), so the top-left corner of its view is off the map.
    assert_eq!(*view.get_pixel(0, 0), gridworld::palette::OUT_OF_BOUNDS);
}

#[test]
fn walls_block_movement() {
    let mut env = NormEnv::new(NormConfig::default()).unwrap();
    let outcome = env.step(&actions(&[Action::Up, Action::Down])).unwrap();
    assert_eq!(env.agents()[0].pos, Position::new(1, 1));
    assert_eq!(env.agents()[1].pos, Position::new(6, 14));
    assert_eq!(outcome.rewards[&AgentId(0)], 0.0);
    assert!(!outcome.all_done);
    assert!(outcome.dones.values().all(|d| !d));
}

#[test]
fn consumed_items_pay_reward_and_regrow() {
    let mut env = env_with_layout(&["@@@@@", "@PR @", "@@@@@"], 1);

    let outcome = env.step(&actions(&[Action::Right])).unwrap();
    assert_eq!(outcome.rewards[&AgentId(0)], 0.5);
    assert_eq!(outcome.infos[&AgentId(0)].consumed, Some(Color::Red));
    assert!(!outcome.infos[&AgentId(0)].violated_norm);
    assert_eq!(env.grid().get(Position::new(1, 2)), Some(Tile::Agent(AgentId(0))));

    let outcome = env.step(&actions(&[Action::Right])).unwrap();
    assert_eq!(outcome.rewards[&AgentId(0)], 0.0);
    assert_eq!(env.grid().get(Position::new(1, 2)), Some(Tile::Item(Color::Red)));
    assert_eq!(env.timestep(), 2);
}

#[test]
fn forbidden_items_are_flagged() {
    let mut env = env_with_layout(&["@@@@", "@PG@", "@@@@"], 1);
    let outcome = env.step(&actions(&[Action::Right])).unwrap();
    let info = outcome.infos[&AgentId(0)];
    assert_eq!(info.consumed, Some(Color::Green));
    assert!(info.violated_norm);
    assert_eq!(env.agents()[0].violations, 1);
    assert_eq!(env.agents()[0].total_reward, 0.5);
}

#[test]
fn agents_block_each_other() {
    let mut env = env_with_layout(&["@@@@@", "@P P@", "@@@@@"], 2);
    env.step(&actions(&[Action::Right, Action::Left])).unwrap();
    let positions: Vec<Position> = env.agents().iter().map(|a| a.pos).collect();
    let in_middle = positions.iter().filter(|&&p| p == Position::new(1, 2)).count();
    assert_eq!(in_middle, 1, "exactly one agent wins the contested cell");
    assert_ne!(positions[0], positions[1]);
}

#[test]
fn missing_action_is_an_error() {
    let mut env = NormEnv::new(NormConfig::default()).unwrap();
    let err = env.step(&actions(&[Action::Up])).unwrap_err();
    assert!(matches!(err, EnvError::MissingAction(AgentId(1))));
}

#[test]
fn unknown_agent_is_an_error() {
    let mut env = NormEnv::new(NormConfig::default()).unwrap();
    let err = env.step(&actions(&[Action::Up, Action::Up, Action::Up])).unwrap_err();
    assert!(matches!(err, EnvError::UnknownAgent(AgentId(2))));
    assert!(matches!(env.scripted_action(AgentId(5), 2), Err(EnvError::UnknownAgent(_))));
}

#[test]
fn too_few_spawn_points() {
    let config = NormConfig {
        num_agents: 3,
        ..NormConfig::default()
    };
    let err = NormEnv::new(config).err().unwrap();
    assert!(matches!(err, EnvError::NotEnoughSpawnPoints { required: 3, found: 2 }));
}

#[test]
fn same_seed_gives_same_trajectory() {
    let run = || {
        let mut env = NormEnv::new(NormConfig { seed: 7, ..NormConfig::default() }).unwrap();
        for _ in 0..40 {
            let joint: BTreeMap<_, _> = env
                .agent_ids()
                .into_iter()
                .map(|id| (id, env.scripted_action(id, 2).unwrap()))
                .collect();
            env.step(&joint).unwrap();
        }
        (env.grid().clone(), env.agents().to_vec())
    };
    assert_eq!(run(), run());
}

#[test]
fn scripted_agents_collect_rewards() {
    let mut env = NormEnv::new(NormConfig::default()).unwrap();
    let mut total = 0.0;
    for _ in 0..100 {
        let joint: BTreeMap<_, _> = env
            .agent_ids()
            .into_iter()
            .map(|id| (id, env.scripted_action(id, 2).unwrap()))
            .collect();
        let outcome = env.step(&joint).unwrap();
        total += outcome.rewards.values().sum::<f32>();
    }
    assert!(total > 0.0);
}

#[test]
fn render_writes_scaled_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.png");
    let env = NormEnv::new(NormConfig { cell_pixels: 4, ..NormConfig::default() }).unwrap();
    env.render(&path).unwrap();
    let img = image::open(&path).unwrap().to_rgb8();
    assert_eq!((img.width(), img.height()), (64, 32));
    assert_eq!(env.frame_size(), (64, 32));
}

#[test]
fn oversized_buffers_are_rejected() {
    for config in [
        NormConfig { view_radius: usize::MAX / 2, ..NormConfig::default() },
        NormConfig { cell_pixels: 0, ..NormConfig::default() },
        NormConfig { cell_pixels: u32::MAX, ..NormConfig::default() },
    ] {
        let err = NormEnv::new(config).err().unwrap();
        assert!(matches!(err, EnvError::InvalidConfig(_)), "{err}");
    }
}

#[test]
fn largest_allowed_view_is_accepted() {
    let config = NormConfig {
        view_radius: gridworld::config::MAX_VIEW_RADIUS,
        cell_pixels: gridworld::config::MAX_CELL_PIXELS,
        ..NormConfig::default()
    };
    let mut env = NormEnv::new(config).unwrap();
    let obs = env.reset();
    let side = 2 * gridworld::config::MAX_VIEW_RADIUS as u32 + 1;
    assert_eq!((obs[&AgentId(0)].width(), obs[&AgentId(0)].height()), (side, side));
}

#[test]
fn config_from_json_keeps_defaults() {
    let config: NormConfig =
        serde_json::from_str(r#"{ "num_agents": 1, "norm": { "R": true }, "seed": 3 }"#).unwrap();
    assert_eq!(config.num_agents, 1);
    assert_eq!(config.seed, 3);
    assert!(config.is_forbidden(Color::Red));
    assert!(!config.is_forbidden(Color::Green));
    assert_eq!(config.reward_for(Color::Blue), 0.5);
    assert_eq!(config.view_radius, 3);
}
