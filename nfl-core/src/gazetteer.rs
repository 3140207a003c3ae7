//! # Gazetteer NFL — Dicionário de Frases
//!
//! Mapeia frases normalizadas (minúsculas, palavras unidas por um espaço) para
//! um rótulo de entidade. É construído uma única vez e depois só é lido, então
//! pode ser compartilhado entre threads via `Arc` sem nenhuma trava.
//!
//! ## Formato do arquivo
//!
//! Uma entrada por linha, separada por TAB: o rótulo seguido de uma ou mais
//! frases (apelidos) para ele. Linhas vazias e linhas iniciadas por `#` são
//! ignoradas.
//!
//! ```text
//! # rótulo    frases...
//! NFLTeam	New England Patriots	Patriots	New England
//! NFLGame	Super Bowl
//! ```

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Tamanho máximo padrão (em tokens) de uma frase consultada no gazetteer.
///
/// Frases maiores que o limite nunca são testadas pela varredura.
pub const MAX_PHRASE_LENGTH: usize = 5;

/// Normaliza uma sequência de palavras para a forma usada como chave.
///
/// Cada palavra vai para minúsculas e as palavras são unidas por um espaço.
pub fn normalize_phrase<'a, I>(words: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    words
        .into_iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normaliza uma frase escrita livremente (ex: "New  England\tPatriots").
pub fn normalize_text(text: &str) -> String {
    normalize_phrase(text.split_whitespace())
}

/// Dicionário imutável frase → rótulo.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    entries: HashMap<String, String>,
    max_phrase_length: usize,
}

impl Gazetteer {
    /// Gazetteer vazio com o limite de frase indicado.
    pub fn empty(max_phrase_length: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_phrase_length,
        }
    }

    /// Constrói a partir de pares `(frase, rótulo)` já em memória.
    ///
    /// As frases são normalizadas. Frases ou rótulos vazios são rejeitados
    /// (o número de linha reportado é a posição 1-based do par).
    pub fn from_entries<I, P, L>(entries: I, max_phrase_length: usize) -> Result<Self>
    where
        I: IntoIterator<Item = (P, L)>,
        P: AsRef<str>,
        L: AsRef<str>,
    {
        let mut gazetteer = Self::empty(max_phrase_length);
        for (i, (phrase, label)) in entries.into_iter().enumerate() {
            gazetteer.insert(phrase.as_ref(), label.as_ref(), i + 1)?;
        }
        Ok(gazetteer)
    }

    /// Carrega o gazetteer de um arquivo TSV.
    pub fn load(path: impl AsRef<Path>, max_phrase_length: usize) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let gazetteer = Self::read(file, path, max_phrase_length)?;
        info!(
            "GAZETTEER: {} entradas carregadas de {}",
            gazetteer.len(),
            path.display()
        );
        Ok(gazetteer)
    }

    /// Carrega o gazetteer de qualquer leitor no formato TSV.
    pub fn from_reader<R: Read>(reader: R, max_phrase_length: usize) -> Result<Self> {
        Self::read(reader, Path::new("<stream>"), max_phrase_length)
    }

    fn read<R: Read>(reader: R, origin: &Path, max_phrase_length: usize) -> Result<Self> {
        let mut gazetteer = Self::empty(max_phrase_length);

        for (i, line) in BufReader::new(reader).lines().enumerate() {
            let line_no = i + 1;
            let line = line.map_err(|source| Error::Io {
                path: origin.to_path_buf(),
                source,
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let mut fields = line.split('\t');
            let label = fields.next().unwrap_or_default().trim();
            let phrases: Vec<&str> = fields.collect();
            if phrases.is_empty() {
                return Err(Error::MissingPhrase { line: line_no });
            }
            for phrase in phrases {
                gazetteer.insert(phrase, label, line_no)?;
            }
        }

        Ok(gazetteer)
    }

    fn insert(&mut self, phrase: &str, label: &str, line: usize) -> Result<()> {
        let label = label.trim();
        if label.is_empty() {
            return Err(Error::EmptyLabel { line });
        }
        let key = normalize_text(phrase);
        if key.is_empty() {
            return Err(Error::EmptyPhrase { line });
        }

        let length = key.split(' ').count();
        if length > self.max_phrase_length {
            debug!(
                "frase '{}' tem {} tokens, acima do limite {}: nunca será encontrada",
                key, length, self.max_phrase_length
            );
        }

        if let Some(previous) = self.entries.insert(key.clone(), label.to_string()) {
            if previous != label {
                warn!("frase '{}' reclassificada de {} para {} (linha {})", key, previous, label, line);
            }
        }
        Ok(())
    }

    /// Busca exata pela frase normalizada.
    pub fn lookup(&self, phrase: &str) -> Option<&str> {
        self.entries.get(phrase).map(String::as_str)
    }

    pub fn contains(&self, phrase: &str) -> bool {
        self.entries.contains_key(phrase)
    }

    /// Limite de tokens das janelas de busca.
    pub fn max_phrase_length(&self) -> usize {
        self.max_phrase_length
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rótulos distintos presentes no dicionário, em ordem alfabética.
    pub fn labels(&self) -> Vec<&str> {
        self.entries
            .values()
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_phrase(["New", "England", "PATRIOTS"]), "new england patriots");
        assert_eq!(normalize_text("  New   England\tPatriots "), "new england patriots");
    }

    #[test]
    fn test_from_entries_and_lookup() {
        let gaz = Gazetteer::from_entries(
            [("New England Patriots", "NFLTeam"), ("Super Bowl", "NFLGame")],
            MAX_PHRASE_LENGTH,
        )
        .unwrap();

        assert_eq!(gaz.lookup("new england patriots"), Some("NFLTeam"));
        assert_eq!(gaz.lookup("super bowl"), Some("NFLGame"));
        // Busca exata: sem casamento parcial nem insensível a caixa na consulta
        assert_eq!(gaz.lookup("new england"), None);
        assert_eq!(gaz.lookup("Super Bowl"), None);
        assert_eq!(gaz.labels(), vec!["NFLGame", "NFLTeam"]);
    }

    #[test]
    fn test_rejects_empty_phrase() {
        let err = Gazetteer::from_entries([("Bears", "NFLTeam"), ("   ", "NFLTeam")], 5).unwrap_err();
        assert!(matches!(err, Error::EmptyPhrase { line: 2 }));
    }

    #[test]
    fn test_rejects_empty_label() {
        let err = Gazetteer::from_entries([("Bears", "")], 5).unwrap_err();
        assert!(matches!(err, Error::EmptyLabel { line: 1 }));
    }

    #[test]
    fn test_last_entry_wins() {
        let gaz = Gazetteer::from_entries([("Giants", "NFLTeam"), ("giants", "Other")], 5).unwrap();
        assert_eq!(gaz.len(), 1);
        assert_eq!(gaz.lookup("giants"), Some("Other"));
    }

    #[test]
    fn test_from_reader_tsv() {
        let data = "# times\nNFLTeam\tChicago Bears\tBears\n\nNFLGame\tSuper Bowl\n";
        let gaz = Gazetteer::from_reader(data.as_bytes(), 4).unwrap();
        assert_eq!(gaz.len(), 3);
        assert_eq!(gaz.lookup("bears"), Some("NFLTeam"));
        assert_eq!(gaz.lookup("chicago bears"), Some("NFLTeam"));
        assert_eq!(gaz.max_phrase_length(), 4);
    }

    #[test]
    fn test_from_reader_missing_phrase() {
        let data = "NFLTeam\tBears\nNFLGame\n";
        let err = Gazetteer::from_reader(data.as_bytes(), 5).unwrap_err();
        assert!(matches!(err, Error::MissingPhrase { line: 2 }));
    }

    #[test]
    fn test_from_reader_empty_alias() {
        let data = "NFLTeam\tBears\t\n";
        let err = Gazetteer::from_reader(data.as_bytes(), 5).unwrap_err();
        assert!(matches!(err, Error::EmptyPhrase { line: 1 }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "NFLTeam\tGreen Bay Packers\tPackers").unwrap();
        writeln!(file, "NFLTeam\tDallas Cowboys").unwrap();

        let gaz = Gazetteer::load(file.path(), MAX_PHRASE_LENGTH).unwrap();
        assert_eq!(gaz.len(), 3);
        assert_eq!(gaz.lookup("green bay packers"), Some("NFLTeam"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Gazetteer::load("/nonexistent/nfl_gazetteer.tsv", 5).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_long_phrase_is_kept() {
        // Frase com 6 tokens e limite 5: aceita no carregamento, inalcançável na varredura
        let gaz = Gazetteer::from_entries([("a b c d e f", "NFLTeam")], 5).unwrap();
        assert!(gaz.contains("a b c d e f"));
    }
}
