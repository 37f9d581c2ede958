//! Basic demonstration of the Furrow farm simulation.
//!
//! Run with: cargo run --example basic_demo
//! Set `RUST_LOG=furrow_sim=debug` to see every action.

use furrow_sim::{snapshot_to_json_pretty, Direction, FarmWorld, Rect, Tool, ToolKind};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("furrow_sim=info")),
        )
        .init();

    println!("=== Furrow - Farm Simulation Demo ===\n");

    let mut farm = FarmWorld::new();
    farm.spawn_actor("farmer", 0, 0, Tool::preset(ToolKind::Plow));

    // Plow the three rows in front of the farmer, facing north
    let front = farm
        .select("farmer", (-3, -1), (-1, 1))
        .expect("farmer exists")
        .expect("selection within reach");
    let outcome = farm.plow("farmer", front, Direction::North).expect("plow");
    println!("Plowed {} cells", outcome.cells_visited);

    // Sow them with tomatoes
    farm.bind_seed_container("farmer", 20, "tomato").expect("seeds");
    let outcome = farm.sow("farmer", front, Direction::North).expect("sow");
    println!("Sowed {} cells, {} crops on the farm\n", outcome.cells_visited, farm.snapshot().crops.len());

    // Water and sun every day until the first harvest
    farm.bind_water_container("farmer", 40).expect("water");
    let watering = Rect::new(-1, -3, 3, 3);
    for _ in 0..8 {
        farm.refill("farmer").expect("refill");
        for _ in 0..2 {
            farm.water("farmer", watering, Direction::North).expect("water");
        }
        let field_ids: Vec<String> = farm
            .snapshot()
            .crops
            .iter()
            .map(|crop| crop.field_id.clone())
            .collect();
        for field_id in &field_ids {
            farm.add_sun(field_id, 3).expect("sun");
        }

        let report = farm.advance_day().expect("advance day");
        println!(
            "Day {}: {} crops, {} advanced, {} ripened",
            farm.current_day(),
            report.crops,
            report.advanced,
            report.ripened
        );
    }

    print_crops(&mut farm);

    let field_ids: Vec<String> = farm
        .snapshot()
        .crops
        .iter()
        .filter(|crop| crop.ripe)
        .map(|crop| crop.field_id.clone())
        .collect();
    let harvested = field_ids
        .iter()
        .filter(|field_id| farm.harvest(field_id).unwrap_or(false))
        .count();
    println!("\nHarvested {} crops\n", harvested);

    println!("=== Final State (JSON) ===\n");
    println!("{}", snapshot_to_json_pretty(&farm.snapshot()).unwrap());
}

fn print_crops(farm: &mut FarmWorld) {
    let snapshot = farm.snapshot();

    println!("\n  Crops:");
    for crop in &snapshot.crops {
        println!(
            "    {}: stage={} ripe={} [{}] water={} sun={} days={}",
            crop.field_id, crop.stage, crop.ripe, crop.gfx, crop.water, crop.sun, crop.days
        );
    }
}
