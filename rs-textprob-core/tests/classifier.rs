use std::collections::BTreeMap;

use rs_textprob_core::config::{BuildConfig, ClassifierConfig, ModelKind};
use rs_textprob_core::model::builder::LexiconBuilder;
use rs_textprob_core::model::classifier::Classifier;
use rs_textprob_core::model::language_data::LanguageData;
use rs_textprob_core::model::splitter::Characters;
use rs_textprob_core::Error;

const ENGLISH: &[&str] = &[
	"the cat sat on the mat",
	"the dog is in the house",
	"where is the cat",
	"the house of the dog is big",
];

const FRENCH: &[&str] = &[
	"le chat est sur le tapis",
	"le chien est dans la maison",
	"où est le chat",
	"la maison du chien est grande",
];

fn data_dir() -> tempfile::TempDir {
	let dir = tempfile::tempdir().unwrap();
	for (code, corpus) in [("en", ENGLISH), ("fr", FRENCH)] {
		LanguageData::from_corpus(corpus, &BuildConfig::default())
			.unwrap()
			.save_json(dir.path().join(format!("{code}.json")))
			.unwrap();
	}
	dir
}

fn config(dir: &tempfile::TempDir, priors: &[(&str, f64)]) -> ClassifierConfig {
	let priors: BTreeMap<String, f64> = priors.iter().map(|(k, v)| (k.to_string(), *v)).collect();
	ClassifierConfig::new(dir.path(), priors).unwrap()
}

fn assert_distribution(posterior: &BTreeMap<String, f64>) {
	let sum: f64 = posterior.values().sum();
	assert!((sum - 1.0).abs() < 1e-9, "posteriors sum to {sum}");
}

#[test]
fn character_lexicon_end_to_end() {
	let mut builder = LexiconBuilder::new(Characters);
	builder.add("aab");
	let lexicon = builder.lexicon();

	assert_eq!(lexicon.total_observations(), 3);
	assert_eq!((lexicon.count("a"), lexicon.count("b")), (2, 1));
	assert!((lexicon.get("a").unwrap() - 2.0 / 3.0).abs() < 1e-12);
	assert!((lexicon.get("b").unwrap() - 1.0 / 3.0).abs() < 1e-12);
}

#[test]
fn recognizes_each_language() {
	let dir = data_dir();
	let classifier = Classifier::from_config(&config(&dir, &[("en", 1.0), ("fr", 1.0)])).unwrap();

	let english = classifier.classify("the cat is in the house");
	assert_distribution(&english);
	assert!(english["en"] > english["fr"]);

	let french = classifier.classify("le chien est dans la maison");
	assert_distribution(&french);
	assert!(french["fr"] > french["en"]);

	assert_eq!(classifier.most_likely("où est le chat").unwrap().0, "fr");
}

#[test]
fn stateless_models_classify_too() {
	let dir = data_dir();
	let mut config = config(&dir, &[("en", 1.0), ("fr", 1.0)]);
	config.model.kind = ModelKind::Stateless;
	let classifier = Classifier::from_config(&config).unwrap();

	let posterior = classifier.classify("the house");
	assert_distribution(&posterior);
	assert!(posterior["en"] > posterior["fr"]);
}

#[test]
fn unknown_alphabet_is_uniform_for_stateless() {
	let dir = data_dir();
	let mut config = config(&dir, &[("en", 3.0), ("fr", 1.0)]);
	config.model.kind = ModelKind::Stateless;
	let classifier = Classifier::from_config(&config).unwrap();

	let posterior = classifier.classify("Жж");
	assert!((posterior["en"] - 0.5).abs() < 1e-12);
	assert!((posterior["fr"] - 0.5).abs() < 1e-12);
}

#[test]
fn missing_language_is_fatal() {
	let dir = data_dir();
	let result = Classifier::from_config(&config(&dir, &[("en", 1.0), ("de", 1.0)]));
	assert!(matches!(result, Err(Error::MissingLanguageData { code, .. }) if code == "de"));
}

#[test]
fn binary_cache_gives_same_posteriors() {
	let dir = data_dir();
	let mut config = config(&dir, &[("en", 2.0), ("fr", 1.0)]);
	let plain = Classifier::from_config(&config).unwrap().classify("the chat");

	config.cache_binary = true;
	let first = Classifier::from_config(&config).unwrap().classify("the chat");
	let cached = Classifier::from_config(&config).unwrap().classify("the chat");

	assert!(dir.path().join("en.bin").exists());
	assert_eq!(plain, first);
	assert_eq!(plain, cached);
}
