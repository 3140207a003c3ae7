//! # Corpus de Demonstração do Domínio NFL
//!
//! Um gazetteer com os 32 times da NFL (nome completo, cidade e apelido) e
//! algumas frases de jogo, mais um punhado de sentenças já etiquetadas como o
//! pipeline genérico as entregaria: POS e NER por token e as menções do CRF,
//! incluindo os erros típicos que o pós-processamento corrige.
//!
//! Usado pelo servidor quando nenhum gazetteer é configurado e pelos testes.

use crate::error::Result;
use crate::gazetteer::Gazetteer;
use crate::mention::{make_mention_id, Mention, Sentence, NFL_GAME, NFL_TEAM};
use crate::tokenizer::Token;

/// Times da NFL: nome completo seguido dos apelidos não ambíguos.
///
/// Cidades com dois times ("New York", "Los Angeles") ficam só com o nome completo.
const TEAMS: &[&[&str]] = &[
    &["Arizona Cardinals", "Arizona", "Cardinals"],
    &["Atlanta Falcons", "Atlanta", "Falcons"],
    &["Baltimore Ravens", "Baltimore", "Ravens"],
    &["Buffalo Bills", "Buffalo", "Bills"],
    &["Carolina Panthers", "Carolina", "Panthers"],
    &["Chicago Bears", "Chicago", "Bears"],
    &["Cincinnati Bengals", "Cincinnati", "Bengals"],
    &["Cleveland Browns", "Cleveland", "Browns"],
    &["Dallas Cowboys", "Dallas", "Cowboys"],
    &["Denver Broncos", "Denver", "Broncos"],
    &["Detroit Lions", "Detroit", "Lions"],
    &["Green Bay Packers", "Green Bay", "Packers"],
    &["Houston Texans", "Houston", "Texans"],
    &["Indianapolis Colts", "Indianapolis", "Colts"],
    &["Jacksonville Jaguars", "Jacksonville", "Jaguars"],
    &["Kansas City Chiefs", "Kansas City", "Chiefs"],
    &["Las Vegas Raiders", "Las Vegas", "Raiders"],
    &["Los Angeles Chargers", "Chargers"],
    &["Los Angeles Rams", "Rams"],
    &["Miami Dolphins", "Miami", "Dolphins"],
    &["Minnesota Vikings", "Minnesota", "Vikings"],
    &["New England Patriots", "New England", "Patriots"],
    &["New Orleans Saints", "New Orleans", "Saints"],
    &["New York Giants", "Giants"],
    &["New York Jets", "Jets"],
    &["Philadelphia Eagles", "Philadelphia", "Eagles"],
    &["Pittsburgh Steelers", "Pittsburgh", "Steelers"],
    &["San Francisco 49ers", "San Francisco", "49ers"],
    &["Seattle Seahawks", "Seattle", "Seahawks"],
    &["Tampa Bay Buccaneers", "Tampa Bay", "Buccaneers", "Bucs"],
    &["Tennessee Titans", "Tennessee", "Titans"],
    &["Washington Commanders", "Washington", "Commanders"],
];

/// Frases de jogo. Presentes no dicionário, mas não injetadas pela política padrão.
const GAMES: &[&str] = &["Super Bowl", "win", "victory", "loss", "defeat", "game", "wild card game"];

/// Pares `(frase, rótulo)` do gazetteer de demonstração.
pub fn demo_gazetteer_entries() -> Vec<(&'static str, &'static str)> {
    TEAMS
        .iter()
        .flat_map(|aliases| aliases.iter().map(|a| (*a, NFL_TEAM)))
        .chain(GAMES.iter().map(|g| (*g, NFL_GAME)))
        .collect()
}

/// Constrói o gazetteer de demonstração.
pub fn demo_gazetteer(max_phrase_length: usize) -> Result<Gazetteer> {
    Gazetteer::from_entries(demo_gazetteer_entries(), max_phrase_length)
}

/// Uma sentença de demonstração: `(palavra, POS, NER)` e menções `(rótulo, start, end)` do CRF.
struct DemoSentence {
    tokens: &'static [(&'static str, &'static str, &'static str)],
    mentions: &'static [(&'static str, usize, usize)],
}

const DEMO: &[DemoSentence] = &[
    // O CRF vê só "Patriots"; o gazetteer recupera o nome completo.
    DemoSentence {
        tokens: &[
            ("The", "DT", "O"),
            ("New", "NNP", "ORGANIZATION"),
            ("England", "NNP", "ORGANIZATION"),
            ("Patriots", "NNPS", "ORGANIZATION"),
            ("won", "VBD", "O"),
            ("on", "IN", "O"),
            ("Sunday", "NNP", "DATE"),
            (".", ".", "O"),
        ],
        mentions: &[(NFL_TEAM, 3, 4)],
    },
    // "the fourth quarter" marcado como data pelo NER genérico.
    DemoSentence {
        tokens: &[
            ("Brady", "NNP", "PERSON"),
            ("threw", "VBD", "O"),
            ("two", "CD", "NUMBER"),
            ("touchdowns", "NNS", "O"),
            ("in", "IN", "O"),
            ("the", "DT", "DATE"),
            ("fourth", "JJ", "DATE"),
            ("quarter", "NN", "DATE"),
            ("against", "IN", "O"),
            ("the", "DT", "O"),
            ("Jets", "NNPS", "ORGANIZATION"),
            (".", ".", "O"),
        ],
        mentions: &[],
    },
    // Fragmento "' 1" como data e um placar seguido de jogo.
    DemoSentence {
        tokens: &[
            ("Green", "NNP", "LOCATION"),
            ("Bay", "NNP", "LOCATION"),
            ("took", "VBD", "O"),
            ("a", "DT", "O"),
            ("24", "CD", "NUMBER"),
            ("-", ":", "O"),
            ("10", "CD", "NUMBER"),
            ("win", "NN", "O"),
            ("in", "IN", "O"),
            ("Week", "NN", "O"),
            ("'", "POS", "DATE"),
            ("1", "CD", "DATE"),
            (".", ".", "O"),
        ],
        mentions: &[(NFL_GAME, 7, 8)],
    },
    // Data legítima mantida; time previsto com fronteira errada.
    DemoSentence {
        tokens: &[
            ("On", "IN", "O"),
            ("January", "NNP", "DATE"),
            ("5", "CD", "DATE"),
            (",", ",", "O"),
            ("the", "DT", "O"),
            ("Kansas", "NNP", "LOCATION"),
            ("City", "NNP", "LOCATION"),
            ("Chiefs", "NNPS", "ORGANIZATION"),
            ("beat", "VBD", "O"),
            ("the", "DT", "O"),
            ("Denver", "NNP", "LOCATION"),
            ("Broncos", "NNPS", "ORGANIZATION"),
            (".", ".", "O"),
        ],
        mentions: &[(NFL_TEAM, 6, 8)],
    },
];

/// Sentenças de demonstração como saem do pipeline genérico, antes do pós-processamento.
pub fn demo_sentences() -> Vec<Sentence> {
    DEMO.iter()
        .enumerate()
        .map(|(s, demo)| {
            let tokens: Vec<Token> = demo
                .tokens
                .iter()
                .enumerate()
                .map(|(i, (word, pos, ner))| Token::new(i, *word, *pos, *ner))
                .collect();
            let mentions = demo
                .mentions
                .iter()
                .enumerate()
                .map(|(k, (label, start, end))| {
                    Mention::new(make_mention_id(Some("demo"), s, k), *label, *start, *end, &tokens)
                })
                .collect();
            Sentence {
                doc_id: Some("demo".to_string()),
                tokens,
                mentions,
            }
        })
        .collect()
}
