mod common;

use common::{AgentBuilder, SimulationBuilder};
use murmuration_lib::model::error::SimError;
use murmuration_lib::model::geometry::Shape;
use murmuration_lib::model::{BoundaryPolicy, Vector2};

#[test]
fn test_empty_simulation_ticks() {
    let mut sim = SimulationBuilder::new().build();
    sim.tick();
    assert!(sim.is_empty());
    assert_eq!(sim.tick_count(), 1);
    assert_eq!(sim.partition().len(), 1);
}

#[test]
fn test_agent_outside_world_is_not_an_error() {
    let mut sim = SimulationBuilder::new()
        .with_agent(AgentBuilder::new().at(-15.0, 300.0).build())
        .with_agent(AgentBuilder::new().at(-14.0, 300.0).build())
        .build();

    assert!(sim.query_index(&Shape::from(sim.world_rect())).is_empty());

    for _ in 0..40 {
        sim.tick();
    }
    // edge avoidance sweeps them back on canvas
    assert!(sim.agents().iter().all(|a| a.position.x >= 0.0));
    assert_eq!(sim.metrics().summary().outside, 0);
}

#[test]
fn test_outside_agent_does_not_steer_against_inside_agents() {
    let mut sim = SimulationBuilder::new()
        .with_boundary(BoundaryPolicy::Wrap)
        .with_weights(1.0, 1.0, 1.0)
        .with_agent(AgentBuilder::new().at(-1.0, 300.0).build())
        .with_agent(AgentBuilder::new().at(5.0, 300.0).build())
        .build();

    assert_eq!(sim.index().len(), 1);
    assert!(sim.neighbors_of(0).unwrap().is_empty());
    assert!(sim.neighbors_of(1).unwrap().is_empty());

    sim.tick();
    assert_eq!(sim.agents()[0].velocity, Vector2::ZERO);
    assert_eq!(sim.agents()[1].velocity, Vector2::ZERO);
    // wrap still brings the outsider back
    assert_eq!(sim.agents()[0].position, Vector2::new(1000.0, 300.0));
}

#[test]
fn test_wrap_sends_agents_to_opposite_edge() {
    let mut sim = SimulationBuilder::new()
        .with_boundary(BoundaryPolicy::Wrap)
        .with_weights(0.0, 0.0, 0.0)
        .with_agent(AgentBuilder::new().at(1.0, 599.0).velocity(-2.0, 2.0).build())
        .build();

    sim.tick();
    assert_eq!(sim.agents()[0].position, Vector2::new(1000.0, 0.0));
}

#[test]
fn test_zero_radius_sees_nobody() {
    let mut sim = SimulationBuilder::new()
        .with_agent(AgentBuilder::new().at(500.0, 300.0).radius(0.0).build())
        .with_agent(AgentBuilder::new().at(500.5, 300.0).radius(0.0).build())
        .build();

    assert!(sim.neighbors_of(0).unwrap().is_empty());
    sim.tick();
    assert_eq!(sim.agents()[0].velocity, Vector2::ZERO);
}

#[test]
fn test_coincident_agents_terminate_and_stay_finite() {
    let mut builder = SimulationBuilder::new().with_config(|c| c.index.max_depth = 6);
    for _ in 0..40 {
        builder = builder.with_agent(AgentBuilder::new().at(250.0, 250.0).build());
    }
    let mut sim = builder.build();
    assert!(sim.index().depth() <= 6);
    assert_eq!(sim.query_index(&Shape::from(sim.world_rect())).len(), 40);

    sim.tick();
    for agent in sim.agents() {
        assert!(agent.position.is_finite());
        assert!(agent.velocity.is_finite());
    }
}

#[test]
fn test_nan_velocity_does_not_spread() {
    let mut sim = SimulationBuilder::new()
        .with_agent(AgentBuilder::new().at(500.0, 300.0).velocity(f64::NAN, 0.0).build())
        .with_agent(AgentBuilder::new().at(510.0, 300.0).velocity(1.0, 0.0).build())
        .build();

    sim.tick();
    sim.tick();
    for agent in sim.agents() {
        assert!(agent.velocity.is_finite());
    }
}

#[test]
fn test_kinematics_round_trip_through_external_kernel() {
    let mut sim = SimulationBuilder::new()
        .with_agent(AgentBuilder::new().at(100.0, 100.0).velocity(1.0, 0.0).build())
        .with_agent(AgentBuilder::new().at(200.0, 200.0).velocity(0.0, 1.0).build())
        .build();

    let mut positions = vec![0.0f32; 4];
    let mut velocities = vec![0.0f32; 4];
    sim.write_kinematics(&mut positions, &mut velocities).unwrap();
    assert_eq!(positions, vec![100.0, 100.0, 200.0, 200.0]);

    // a kernel moved everyone by their velocity
    for i in 0..4 {
        positions[i] += velocities[i];
    }
    sim.read_kinematics(&positions, &velocities).unwrap();
    assert_eq!(sim.agents()[0].position, Vector2::new(101.0, 100.0));
    assert_eq!(sim.agents()[1].position, Vector2::new(200.0, 201.0));

    let err = sim.read_kinematics(&positions[..3], &velocities).unwrap_err();
    assert!(matches!(err, SimError::BufferLength { expected: 4, actual: 3 }));
}

#[test]
fn test_remove_then_tick_uses_valid_indices() {
    let mut sim = SimulationBuilder::new()
        .with_agent(AgentBuilder::new().at(500.0, 300.0).build())
        .with_agent(AgentBuilder::new().at(505.0, 300.0).build())
        .with_agent(AgentBuilder::new().at(510.0, 300.0).build())
        .build();

    sim.remove_agent(1).unwrap();
    assert_eq!(sim.neighbors_of(0).unwrap(), vec![1]);
    sim.tick();
    assert_eq!(sim.len(), 2);

    let idx = sim.add_agent(AgentBuilder::new().at(520.0, 300.0).build());
    assert_eq!(idx, 2);
    assert_eq!(sim.neighbors_of(2).unwrap().len(), 2);
}

#[test]
fn test_host_frame_tracks_ticks() {
    let mut sim = SimulationBuilder::new()
        .with_agent(AgentBuilder::new().at(100.0, 100.0).velocity(1.0, 0.0).build())
        .build();
    let mut frame = sim.snapshot();

    sim.tick();
    sim.snapshot_into(&mut frame);
    assert_eq!(frame, sim.snapshot());

    sim.spawn_burst(Vector2::new(500.0, 300.0), 4, 10.0).unwrap();
    sim.snapshot_into(&mut frame);
    assert_eq!(frame.count, 5);
    assert_eq!(frame.positions.len(), 10);
}
