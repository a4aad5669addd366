use std::collections::{HashMap, HashSet};
use std::io::Read as _;
use std::path::{Path, PathBuf};

use bzip2::read::BzDecoder;
use chrono::{Duration, NaiveDate, Utc};

use crate::as_graph::{ASBuilder, ASGraph, ASN};
use crate::error::SimError;

const CAIDA_BASE_URL: &str = "https://publicdata.caida.org/datasets/as-relationships/serial-2";

/// Downloads and caches CAIDA `serial-2` AS-relationship files. CAIDA
/// publishes one file per day but not every day has one, so this walks
/// backwards from the requested date until it finds a file that exists.
pub struct CAIDAASGraphCollector {
    cache_dir: PathBuf,
}

impl CAIDAASGraphCollector {
    pub fn new(cache_dir: PathBuf) -> Self {
        CAIDAASGraphCollector { cache_dir }
    }

    /// Returns the path to a decompressed serial-2 file on disk for `date`
    /// (or the closest earlier date CAIDA actually published), downloading
    /// and decompressing it into the cache directory if not already there.
    pub fn fetch(&self, date: NaiveDate) -> Result<PathBuf, SimError> {
        std::fs::create_dir_all(&self.cache_dir)?;

        let mut candidate = date;
        let earliest = NaiveDate::from_ymd_opt(1998, 1, 1).unwrap();
        loop {
            let file_name = format!("{}.as-rel2.txt", candidate.format("%Y%m%d"));
            let cached_path = self.cache_dir.join(&file_name);
            if cached_path.exists() {
                return Ok(cached_path);
            }

            let url = format!("{}/{}.as-rel2.txt.bz2", CAIDA_BASE_URL, candidate.format("%Y%m%d"));
            match self.download_and_decompress(&url, &cached_path) {
                Ok(()) => return Ok(cached_path),
                Err(_) if candidate > earliest => {
                    candidate -= Duration::days(1);
                    continue;
                }
                Err(_) => return Err(SimError::NoCaidaUrl),
            }
        }
    }

    fn download_and_decompress(&self, url: &str, dest: &Path) -> Result<(), SimError> {
        let response = reqwest::blocking::get(url).map_err(|e| SimError::Network(e.to_string()))?;
        if !response.status().is_success() {
            return Err(SimError::Network(format!("{} returned {}", url, response.status())));
        }
        let bytes = response.bytes().map_err(|e| SimError::Network(e.to_string()))?;

        let mut decoder = BzDecoder::new(&bytes[..]);
        let mut contents = String::new();
        decoder.read_to_string(&mut contents)?;

        std::fs::write(dest, contents)?;
        Ok(())
    }

    /// Convenience wrapper for "give me whatever CAIDA has closest to today".
    pub fn fetch_latest(&self) -> Result<PathBuf, SimError> {
        self.fetch(Utc::now().date_naive() - Duration::days(2))
    }
}

/// Parses a CAIDA `serial-2` `as-rel2.txt` file into `ASBuilder`s and builds
/// an `ASGraph` from them.
///
/// Format, one record per non-comment line:
///   `# input clique: <asn> <asn> ...`   -- known tier-1 ASes
///   `# IXP ASes: <asn> <asn> ...`       -- known IXP route-server ASes
///   `<provider>|<customer>|-1|<source>` -- provider-to-customer relationship
///   `<peer>|<peer>|0|<source>`          -- peer-to-peer relationship
pub struct CAIDAASGraphJSONConverter {
    file_path: PathBuf,
}

impl CAIDAASGraphJSONConverter {
    pub fn new(file_path: &Path) -> Self {
        CAIDAASGraphJSONConverter {
            file_path: file_path.to_path_buf(),
        }
    }

    pub fn convert(&self) -> Result<ASGraph, SimError> {
        let contents = std::fs::read_to_string(&self.file_path)?;

        let mut clique: HashSet<ASN> = HashSet::new();
        let mut ixps: HashSet<ASN> = HashSet::new();
        let mut providers: HashMap<ASN, HashSet<ASN>> = HashMap::new();
        let mut customers: HashMap<ASN, HashSet<ASN>> = HashMap::new();
        let mut peers: HashMap<ASN, HashSet<ASN>> = HashMap::new();
        let mut all_asns: HashSet<ASN> = HashSet::new();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(rest) = line.strip_prefix("# input clique:") {
                clique.extend(Self::parse_asn_list(rest));
                continue;
            }
            if let Some(rest) = line.strip_prefix("# IXP ASes:") {
                ixps.extend(Self::parse_asn_list(rest));
                continue;
            }
            if line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split('|').collect();
            if fields.len() < 3 {
                continue;
            }
            let a: ASN = fields[0].parse().map_err(|_| SimError::NoCaidaUrl)?;
            let b: ASN = fields[1].parse().map_err(|_| SimError::NoCaidaUrl)?;
            let rel: i32 = fields[2].parse().map_err(|_| SimError::NoCaidaUrl)?;

            all_asns.insert(a);
            all_asns.insert(b);

            match rel {
                -1 => {
                    // a is provider, b is customer
                    customers.entry(a).or_default().insert(b);
                    providers.entry(b).or_default().insert(a);
                }
                0 => {
                    peers.entry(a).or_default().insert(b);
                    peers.entry(b).or_default().insert(a);
                }
                _ => continue,
            }
        }

        let builders: Vec<ASBuilder> = all_asns
            .iter()
            .map(|&asn| {
                let mut builder = ASBuilder::from_asn_sets(
                    asn,
                    peers.remove(&asn).unwrap_or_default(),
                    providers.remove(&asn).unwrap_or_default(),
                    customers.remove(&asn).unwrap_or_default(),
                );
                if clique.contains(&asn) {
                    builder = builder.as_tier_1();
                }
                if ixps.contains(&asn) {
                    builder = builder.as_ixp();
                }
                builder
            })
            .collect();

        Ok(ASGraph::build(builders))
    }

    fn parse_asn_list(rest: &str) -> Vec<ASN> {
        rest.split_whitespace().filter_map(|s| s.parse().ok()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScratchFile(PathBuf);

    impl ScratchFile {
        fn new(name: &str, content: &str) -> Self {
            let path = std::env::temp_dir().join(name);
            std::fs::write(&path, content).unwrap();
            ScratchFile(path)
        }
    }

    impl Drop for ScratchFile {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    #[test]
    fn parses_clique_ixp_and_relationship_lines() {
        let file = ScratchFile::new(
            "caida_test_parses_clique_ixp_and_relationship_lines.txt",
            "# input clique: 1 2\n\
             # IXP ASes: 99\n\
             1|3|-1|source\n\
             3|4|0|source\n",
        );
        let converter = CAIDAASGraphJSONConverter::new(&file.0);
        let graph = converter.convert().unwrap();

        assert!(graph.get(&1).unwrap().tier_1);
        assert!(graph.get(&3).unwrap().provider_asns.contains(&1));
        assert!(graph.get(&1).unwrap().customer_asns.contains(&3));
        assert!(graph.get(&3).unwrap().peer_asns.contains(&4));
        assert!(graph.get(&4).unwrap().peer_asns.contains(&3));
    }
}
