use crate::args::InfoArgs;
use crate::errors::*;
use crate::index::SeedIndex;

pub fn main(args: &InfoArgs) -> Result<()> {
    let (index, store) = SeedIndex::read(&args.index)
        .chain_err(|| format!("failed to read seed index {:?}", &args.index))?;

    println!("{}", index.summarize());
    println!("  generation:   {}", index.generation());
    println!("  state:        {}", index.status().state);
    println!("  utr only:     {}", index.utr_only());
    println!("  transcripts:  {}", store.transcript_count());
    println!("  total bases:  {}", store.total_bases());
    println!("  seed entries: {}", index.seed_count());
    println!("  unique seeds: {}", index.unique_seed_count());

    Ok(())
}
