use chained_hash::HashTable;
use clap::Parser;

#[derive(Parser, Debug)]
struct Args {
    /// Initial number of buckets
    #[arg(short = 'c', long = "capacity", default_value_t = 8)]
    capacity: usize,

    /// Number of sample keys to insert
    #[arg(short = 'k', long = "keys", default_value_t = 12)]
    keys: usize,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut table = match HashTable::with_capacity(args.capacity) {
        Ok(table) => table,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    };

    println!("Created HashTable with {} buckets", table.capacity());

    for i in 0..args.keys {
        let key = format!("key_{i:03}");
        let before = table.capacity();
        table.insert(key, i);
        if table.capacity() != before {
            println!(
                "Inserting key #{} expanded the table: {} -> {} buckets",
                i + 1,
                before,
                table.capacity()
            );
        }
    }

    // Overwrite one key to show updates leave the element count alone.
    if args.keys > 0 {
        table.insert("key_000".to_string(), usize::MAX);
    }

    println!(
        "Inserted {} keys, load factor {:.3}",
        table.len(),
        table.load_factor()
    );

    for (index, entries) in table.dump() {
        println!("Bucket {index}: {entries:?}");
    }

    table.print_chain_histogram();
    table.debug_stats().print();
}
