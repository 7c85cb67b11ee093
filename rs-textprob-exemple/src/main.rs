use std::path::Path;

use log::info;
use rs_textprob_core::config::{BuildConfig, ClassifierConfig};
use rs_textprob_core::model::classifier::Classifier;
use rs_textprob_core::model::language_data::LanguageData;

const SNIPPETS: &[(&str, &str)] = &[
    ("en", "IETF language tags were first"),
    ("en", "from Stesichorus"),
    ("en", "of 106,460,000 km2"),
    ("fr", "où le sigle désigne l'Internet Engineering Task Force"),
    ("fr", "du mot est"),
    ("fr", "donc"),
    ("es", "\"en\" denota al inglés"),
    ("es", "las riberas norteafricanas"),
    ("es", "La máxima"),
    ("de", "sondern jeder darf"),
    ("de", "das relativ"),
    ("de", "geht"),
    ("pt", "Seu nome deriva de Atlas"),
    ("pt", "ao calor"),
    ("pt", "tempo"),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Priors of the five default languages, data read from "./data"
    let config = ClassifierConfig::default();

    // A "<code>.txt" corpus without its "<code>.json" is turned into language data first
    for (code, _) in config.priors() {
        let json = config.data_dir.join(format!("{code}.json"));
        let corpus = config.data_dir.join(format!("{code}.txt"));
        if !json.exists() && corpus.exists() {
            build(&corpus, &json)?;
        }
    }

    let t0 = std::time::Instant::now();
    let classifier = Classifier::from_config(&config)?;
    println!("Loaded classifier in {:.1} seconds.", t0.elapsed().as_secs_f64());

    let t0 = std::time::Instant::now();
    for (code, snippet) in SNIPPETS {
        println!("\"{snippet}\" (language: {code})");
        for (lang, p) in classifier.classify(snippet) {
            let mark = if lang == *code { " ✔" } else { "" };
            println!("    Pr({lang}) = {p:.7}{mark}");
        }
    }
    println!("Classified {} snippets in {:.1} seconds.", SNIPPETS.len(), t0.elapsed().as_secs_f64());

    Ok(())
}

/// Builds summarized language data from a line-oriented corpus file.
fn build(corpus: &Path, json: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = BuildConfig { min_count: Some(5), ..BuildConfig::default() };
    let data = LanguageData::from_corpus_file(corpus, &config)?;
    data.save_json(json)?;
    info!("Saved {}", json.display());
    Ok(())
}
