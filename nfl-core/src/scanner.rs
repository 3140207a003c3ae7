//! # Varredura por Gazetteer — Maior Casamento à Esquerda
//!
//! O CRF do domínio deixa passar muitos nomes de times. A varredura percorre a
//! sentença da esquerda para a direita e, para cada posição inicial, testa as
//! janelas da maior para a menor contra o gazetteer:
//!
//! ```text
//! tokens:  the  new  england  patriots  won
//! start=1: [new england patriots won]  ✗
//!          [new england patriots]      ✓ NFLTeam → menção [1, 4)
//! próximo start = 4 ("won")
//! ```
//!
//! ## Garantias
//! - **Maior casamento**: a primeira janela aceita para um `start` é a maior.
//! - **Sem sobreposição**: após aceitar `[start, end)`, a varredura continua em
//!   `end`, então duas menções inseridas nunca compartilham tokens.
//! - **Limite de janela**: frases com mais tokens que `max_phrase_length` nunca
//!   são testadas.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::config::ScanPolicy;
use crate::gazetteer::{normalize_phrase, Gazetteer};
use crate::mention::{Mention, Sentence, NFL_GAME, NFL_TEAM};
use crate::tokenizer::Token;

/// Varredura de maior casamento sobre um gazetteer compartilhado.
#[derive(Debug, Clone, Copy)]
pub struct DictionaryScanner<'g> {
    gazetteer: &'g Gazetteer,
    accept_teams: bool,
    policy: ScanPolicy,
}

impl<'g> DictionaryScanner<'g> {
    /// `accept_teams` acompanha `prefer_dictionary_for_teams` do filtro: só
    /// injetamos times quando os do etiquetador foram descartados.
    pub fn new(gazetteer: &'g Gazetteer, accept_teams: bool, policy: ScanPolicy) -> Self {
        Self {
            gazetteer,
            accept_teams,
            policy,
        }
    }

    /// Política de produção: apenas `NFLTeam`.
    pub fn teams_only(gazetteer: &'g Gazetteer) -> Self {
        Self::new(gazetteer, true, ScanPolicy::default())
    }

    fn is_active(&self) -> bool {
        self.accept_teams || self.policy.games_from_gazetteer
    }

    /// Encontra os trechos aceitos, sem alterar nada.
    ///
    /// Retorna `(start, end, rótulo)` em ordem crescente de `start`.
    pub fn find_matches(&self, tokens: &[Token], mentions: &[Mention]) -> Vec<(usize, usize, &'g str)> {
        let mut matches = Vec::new();
        if !self.is_active() {
            return matches;
        }

        let game_tokens = if self.policy.games_from_gazetteer {
            game_token_positions(mentions)
        } else {
            HashSet::new()
        };

        let gazetteer: &'g Gazetteer = self.gazetteer;
        let n = tokens.len();
        let max_len = gazetteer.max_phrase_length();
        let mut start = 0;

        while start < n {
            let mut accepted = None;

            for end in (start + 1..=(start + max_len).min(n)).rev() {
                let phrase = normalize_phrase(tokens[start..end].iter().map(|t| t.text.as_str()));
                let Some(label) = gazetteer.lookup(&phrase) else {
                    continue;
                };

                if self.accepts(label, tokens, start, end, &game_tokens) {
                    debug!("Found entity mention candidate from gazetteer: {}", phrase);
                    accepted = Some((end, label));
                    break;
                }
            }

            match accepted {
                Some((end, label)) => {
                    matches.push((start, end, label));
                    start = end;
                }
                None => start += 1,
            }
        }

        matches
    }

    fn accepts(&self, label: &str, tokens: &[Token], start: usize, end: usize, game_tokens: &HashSet<usize>) -> bool {
        if label == NFL_TEAM {
            return self.accept_teams;
        }
        if label == NFL_GAME && self.policy.games_from_gazetteer {
            // Precedido por um placar ("a 10 to 5 win") e fora de jogos já anotados
            let after_score = (start > 0 && is_potential_score(&tokens[start - 1]))
                || (start > 1 && is_potential_score(&tokens[start - 2]));
            return after_score && !(start..end).any(|i| game_tokens.contains(&i));
        }
        false
    }

    /// Acrescenta à sentença as menções encontradas.
    ///
    /// Os identificadores começam em `identifier_offset` e avançam um por
    /// menção inserida. Retorna as menções criadas.
    pub fn scan(&self, sentence: &mut Sentence, sentence_index: usize, identifier_offset: usize) -> Vec<Mention> {
        let matches = self.find_matches(&sentence.tokens, &sentence.mentions);

        let added: Vec<Mention> = matches
            .into_iter()
            .zip(identifier_offset..)
            .map(|((start, end, label), offset)| {
                let id = sentence.mention_id(sentence_index, offset);
                let m = Mention::new(id, label, start, end, &sentence.tokens);
                info!("ADDED ENTITY MENTION (from gazetteer): {}", m);
                m
            })
            .collect();

        sentence.mentions.extend(added.iter().cloned());
        added
    }
}

/// Token plausível como placar: inteiro em `[0, 100)`.
///
/// Texto não numérico é apenas um resultado negativo.
pub fn is_potential_score(token: &Token) -> bool {
    token
        .text
        .parse::<i64>()
        .map(|value| (0..100).contains(&value))
        .unwrap_or(false)
}

/// Posições cobertas por menções de jogo (tipos `NFL*Game`).
fn game_token_positions(mentions: &[Mention]) -> HashSet<usize> {
    mentions
        .iter()
        .filter(|m| m.label.starts_with("NFL") && m.label.ends_with("Game"))
        .flat_map(|m| m.start..m.end)
        .collect()
}
