//! Uniform random sampler

use crate::corpus::Corpus;
use ocr_bench_core::{Sampler, SamplerError};
use rand::seq::SliceRandom;
use rand::Rng;
use std::path::Path;

/// Picks a corpus entry uniformly at random, with replacement
///
/// Each call is independent: the same image may be returned twice in a
/// row and there is no attempt at coverage.
#[derive(Debug, Clone)]
pub struct RandomSampler {
    name: String,
    corpus: Corpus,
}

impl RandomSampler {
    /// Create a sampler over `corpus`
    pub fn new(corpus: Corpus) -> Self {
        Self {
            name: corpus.root().display().to_string(),
            corpus,
        }
    }

    /// The underlying corpus
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Draw one entry using the supplied generator
    pub fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&Path, SamplerError> {
        self.corpus
            .paths()
            .choose(rng)
            .map(|p| p.as_path())
            .ok_or_else(|| SamplerError::Empty(self.name.clone()))
    }
}

impl Sampler for RandomSampler {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> usize {
        self.corpus.len()
    }

    fn sample(&self) -> Result<&Path, SamplerError> {
        self.sample_with(&mut rand::thread_rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn corpus(n: usize) -> Corpus {
        let paths = (0..n)
            .map(|i| PathBuf::from(format!("/corpus/page_{i}.png")))
            .collect();
        Corpus::from_paths("/corpus", paths).unwrap()
    }

    #[test]
    fn test_sampler_metadata() {
        let sampler = RandomSampler::new(corpus(4));
        assert_eq!(sampler.name(), "/corpus");
        assert_eq!(sampler.len(), 4);
        assert!(!sampler.is_empty());
    }

    #[test]
    fn test_single_entry_always_returned() {
        let sampler = RandomSampler::new(corpus(1));
        for _ in 0..100 {
            assert_eq!(sampler.sample().unwrap(), Path::new("/corpus/page_0.png"));
        }
    }

    #[test]
    fn test_samples_come_from_corpus() {
        let sampler = RandomSampler::new(corpus(5));
        for _ in 0..200 {
            let path = sampler.sample().unwrap();
            assert!(sampler.corpus().paths().iter().any(|p| p == path));
        }
    }

    #[test]
    fn test_uniform_distribution() {
        let sampler = RandomSampler::new(corpus(3));
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts: HashMap<PathBuf, usize> = HashMap::new();

        for _ in 0..30_000 {
            let path = sampler.sample_with(&mut rng).unwrap();
            *counts.entry(path.to_path_buf()).or_default() += 1;
        }

        assert_eq!(counts.len(), 3);
        for (path, count) in counts {
            assert!(
                (9_500..=10_500).contains(&count),
                "{} drawn {count} times",
                path.display()
            );
        }
    }

    #[test]
    fn test_sampling_is_with_replacement() {
        let sampler = RandomSampler::new(corpus(2));
        let mut rng = StdRng::seed_from_u64(7);

        // 2 entries, 64 draws: some draw must repeat its predecessor
        let draws: Vec<_> = (0..64)
            .map(|_| sampler.sample_with(&mut rng).unwrap().to_path_buf())
            .collect();
        assert!(draws.windows(2).any(|w| w[0] == w[1]));
    }

    #[test]
    fn test_shared_across_threads() {
        let sampler = std::sync::Arc::new(RandomSampler::new(corpus(3)));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let sampler = std::sync::Arc::clone(&sampler);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        assert!(sampler.sample().is_ok());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
