fn main() {
    match vocabr::run() {
        Ok(Some(tally)) => {
            println!(
                "You marked {} learned and {} for review",
                tally.learned, tally.reviewed
            );
            if tally.total() > 0 && tally.reviewed == 0 {
                println!("Well done!");
            }
        }
        Ok(None) => {}
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
