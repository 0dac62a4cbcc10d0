//! Interactive profile planner
//!
//! Draws a dive profile from a list of waypoints, runs the timeline simulation
//! and prints the decompression stop schedule.
//!
//! Run with: `cargo run --example planner`

use dive_sim::{
    plan_dive,
    profile::ProfilePoint,
    sketch::ProfileSketch,
    stops::total_stop_time,
    zh16c::{ModelConfig, ZHL16A},
    DiveParameters,
};
use std::io::{self, Write};

fn get_float_input(prompt: &str, default: f32) -> f32 {
    loop {
        print!("{} (default: {}): ", prompt, default);
        io::stdout().flush().unwrap();

        let mut input = String::new();
        io::stdin().read_line(&mut input).unwrap();

        let input = input.trim();
        if input.is_empty() {
            return default;
        }

        match input.parse::<f32>() {
            Ok(value) => return value,
            Err(_) => println!("Invalid input. Please enter a valid number."),
        }
    }
}

fn parse_waypoint(entry: &str) -> Option<ProfilePoint> {
    let (minutes, depth) = entry.split_once(':')?;
    Some(ProfilePoint::new(minutes.trim().parse().ok()?, depth.trim().parse().ok()?))
}

/// Waypoints as `minute:depth` pairs; the minute is converted to a time
/// fraction once the dive length is known.
fn get_waypoints_input(total_minutes: f32) -> Vec<ProfilePoint> {
    loop {
        print!("Enter waypoints as minute:depth (comma-separated, e.g., 2:30,20:30,22:6,37:3,40:0): ");
        io::stdout().flush().unwrap();

        let mut input = String::new();
        io::stdin().read_line(&mut input).unwrap();

        let input = input.trim();
        let input = if input.is_empty() { "2:30,20:30,22:6,37:3,40:0" } else { input };

        let waypoints: Option<Vec<ProfilePoint>> = input.split(',').map(parse_waypoint).collect();
        match waypoints {
            Some(waypoints) if !waypoints.is_empty() => {
                return waypoints
                    .into_iter()
                    .map(|point| ProfilePoint::new(point.time_fraction / total_minutes, point.depth))
                    .collect()
            }
            _ => println!("Invalid input. Please enter minute:depth pairs (e.g., 2:30,20:30,40:0)."),
        }
    }
}

fn main() {
    println!("=== Dive Profile Planner ===\n");

    println!("Enter dive parameters:");
    let requested = DiveParameters {
        total_minutes: get_float_input("Dive length (minutes)", 40.0),
        max_depth: get_float_input("Maximum depth (m)", 30.0),
        step_seconds: get_float_input("Simulation step (seconds)", 60.0),
        gf_low: get_float_input("GF Low (0-100)", 30.0),
        gf_high: get_float_input("GF High (0-100)", 85.0),
    };
    if let Err(err) = requested.validate() {
        println!("⚠️  WARNING: {}. Using the nearest valid settings.", err);
    }
    let params = requested.sanitize();
    let use_zhl16a = get_float_input("Use ZH-L16A coefficients (1 = yes)", 0.0) == 1.0;

    println!("Dive Parameters:");
    println!("  Length: {:.0} min", params.total_minutes);
    println!("  Step: {:.0} s", params.step_seconds);
    println!("  GF Low: {:.0}%", params.gf_low);
    println!("  GF High: {:.0}%", params.gf_high);
    println!();

    let mut sketch = ProfileSketch::new(params.total_minutes, params.step_seconds);
    sketch.end_stroke();
    sketch.stroke_to(ProfilePoint::new(0.0, 0.0));
    for point in get_waypoints_input(params.total_minutes) {
        let depth = point.depth.clamp(0.0, params.max_depth);
        sketch.stroke_to(ProfilePoint::new(point.time_fraction, depth));
    }
    sketch.end_stroke();

    let config = if use_zhl16a {
        ModelConfig::default().with_compartments(ZHL16A)
    } else {
        ModelConfig::default()
    };
    let plan = plan_dive(&params, sketch.active_points(), &config);

    println!("\n=== Timeline ===");
    println!("Time (min) | Depth (m) | Ceiling (m) | GF   | Saturation");
    println!("-----------|-----------|-------------|------|-----------");
    let every = (plan.timeline.samples.len() / 20).max(1);
    for sample in plan.timeline.samples.iter().step_by(every) {
        println!(
            "  {:6.1}   |   {:5.1}   |    {:5.1}    | {:.2} |   {:5.1}%",
            sample.time,
            sample.depth,
            sample.ceiling,
            sample.gradient_factor,
            sample.saturation * 100.0
        );
    }
    println!("Deepest ceiling: {:.1}m", plan.timeline.deepest_ceiling());

    println!("\n=== Decompression Stops ===");
    if plan.stops.is_empty() {
        println!("No decompression stops required");
        return;
    }
    println!("Depth (m) | Duration (min) | Start Time (min) | End Time (min)");
    println!("----------|----------------|------------------|----------------");
    for stop in plan.stops.iter() {
        println!(
            "   {:4}   |     {:6.1}     |      {:6.1}      |      {:6.1}",
            stop.depth, stop.duration, stop.start_time, stop.end_time
        );
    }
    println!("\nTotal decompression time: {:.1} minutes", total_stop_time(&plan.stops));
    println!("Number of stops: {}", plan.stops.len());
}
