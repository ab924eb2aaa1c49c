use super::open_engine;

pub fn run(yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !yes {
        return Err("this wipes all recorded stats; pass --yes to confirm".into());
    }
    let mut engine = open_engine()?;
    engine.reset();
    println!("stats wiped");
    Ok(())
}
