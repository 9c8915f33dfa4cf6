//! Default value functions for serde deserialization.

pub fn domain_extent() -> f32 {
    100.0
}

pub fn resolution() -> f32 {
    1.0
}

pub fn max_speed() -> f32 {
    3.0
}

pub fn sweep_spacing() -> f32 {
    5.0
}

pub fn sweep_margin() -> f32 {
    5.0
}

pub fn sweep_speed() -> f32 {
    3.0
}

pub fn measuring_dwell_ticks() -> u32 {
    60
}

pub fn visualizing_dwell_ticks() -> u32 {
    120
}

pub fn arrival_tolerance() -> f32 {
    2.0
}

pub fn waypoint_tolerance() -> f32 {
    3.0
}

pub fn approach_gain() -> f32 {
    0.5
}

pub fn momentum_decay() -> f32 {
    0.5
}

pub fn detection_radius() -> f32 {
    5.0
}

pub fn repulsion_gain() -> f32 {
    0.5
}

pub fn learning_rate() -> f32 {
    3.0
}

pub fn gradient_delta() -> f32 {
    2.0
}

pub fn anneal_rate() -> f32 {
    0.995
}

pub fn min_learning_rate() -> f32 {
    0.5
}

pub fn stuck_ticks() -> u32 {
    30
}

pub fn improvement_threshold() -> f32 {
    0.1
}

pub fn max_kicks() -> u32 {
    5
}

pub fn num_obstacles() -> usize {
    5
}

pub fn obstacle_min_size() -> f32 {
    8.0
}

pub fn obstacle_max_size() -> f32 {
    20.0
}

pub fn edge_margin() -> f32 {
    10.0
}

pub fn smoothing_sigma() -> f32 {
    8.0
}

pub fn value_min() -> f32 {
    -90.0
}

pub fn value_max() -> f32 {
    -30.0
}

pub fn max_ticks() -> u64 {
    10_000
}

pub fn tick_period() -> f32 {
    1.0 / 60.0
}
