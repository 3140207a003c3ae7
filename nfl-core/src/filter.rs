//! # Filtro de Menções Espúrias
//!
//! O etiquetador genérico e o CRF do domínio cometem erros sistemáticos que
//! regras simples reconhecem com segurança:
//!
//! - **Tempo de jogo como data**: "second half", "the fourth quarter" viram
//!   `Date` no NER genérico, mas nunca são anotados como datas no domínio.
//! - **Datas numericamente fracas**: fragmentos como "' 1", sem letras e com
//!   menos de dois dígitos.
//! - **Times do etiquetador**: com `prefer_dictionary_for_teams`, todo `NFLTeam`
//!   previsto é descartado; a varredura do gazetteer repõe os times depois.
//!
//! O filtro é puro: devolve uma nova lista e preserva a ordem das menções que
//! sobrevivem. Como cada regra olha só para a própria menção, aplicar o filtro
//! duas vezes não remove mais nada.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::FilterPolicy;
use crate::mention::{Mention, DATE, NFL_GAME, NFL_TEAM};
use crate::tokenizer::Token;

static GAME_TIME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)half|quarter").unwrap());

// Letras são só a categoria L e dígitos só Nd: "Ⅻ" e "²" não contam
static LETTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{L}").unwrap());
static DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{Nd}").unwrap());

/// Motivo pelo qual uma menção foi descartada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    /// `Date` que na verdade é um período de jogo ("second half").
    GameTime,
    /// `Date` sem letras e com menos de dois dígitos ("' 1").
    InvalidDate,
    /// `NFLTeam` previsto pelo etiquetador; o gazetteer tem preferência.
    TeamFromTagger,
    /// `NFLGame` cujo último token não é substantivo (alternativa desativada).
    GameWithoutNounHead,
}

impl RemovalReason {
    pub fn name(&self) -> &'static str {
        match self {
            RemovalReason::GameTime => "game time",
            RemovalReason::InvalidDate => "invalid date",
            RemovalReason::TeamFromTagger => "team predicted by tagger",
            RemovalReason::GameWithoutNounHead => "game headed by non-noun",
        }
    }
}

impl std::fmt::Display for RemovalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Resultado de uma passada do filtro.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// Menções mantidas, na ordem original.
    pub kept: Vec<Mention>,
    /// Menções descartadas com o respectivo motivo.
    pub removed: Vec<(Mention, RemovalReason)>,
}

/// Aplica as heurísticas de remoção segundo uma [`FilterPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MentionFilter {
    policy: FilterPolicy,
}

impl MentionFilter {
    pub fn new(policy: FilterPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> FilterPolicy {
        self.policy
    }

    /// Decide se a menção deve ser descartada, e por quê.
    ///
    /// As regras são avaliadas em ordem; vale o primeiro motivo encontrado.
    pub fn removal_reason(&self, mention: &Mention, tokens: &[Token]) -> Option<RemovalReason> {
        if mention.is_type(DATE) && is_game_time(&mention.text) {
            return Some(RemovalReason::GameTime);
        }
        if mention.is_type(DATE) && is_invalid_date(&mention.text) {
            return Some(RemovalReason::InvalidDate);
        }
        if self.policy.prefer_dictionary_for_teams && mention.is_type(NFL_TEAM) {
            return Some(RemovalReason::TeamFromTagger);
        }
        if self.policy.drop_games_without_noun_head
            && mention.is_type(NFL_GAME)
            && !headed_by_noun(mention, tokens)
        {
            return Some(RemovalReason::GameWithoutNounHead);
        }
        None
    }

    /// Separa as menções em mantidas e descartadas.
    pub fn apply(&self, mentions: &[Mention], tokens: &[Token]) -> FilterOutcome {
        let mut outcome = FilterOutcome::default();
        for m in mentions {
            match self.removal_reason(m, tokens) {
                Some(reason) => {
                    info!("REMOVING ENTITY MENTION ({}): {}", reason, m);
                    outcome.removed.push((m.clone(), reason));
                }
                None => outcome.kept.push(m.clone()),
            }
        }
        outcome
    }

    /// Devolve apenas as menções que sobrevivem ao filtro.
    pub fn filter(&self, mentions: &[Mention], tokens: &[Token]) -> Vec<Mention> {
        self.apply(mentions, tokens).kept
    }
}

/// O texto menciona um período de jogo ("half", "quarter"), sem diferenciar caixa.
pub fn is_game_time(text: &str) -> bool {
    GAME_TIME.is_match(text)
}

/// Sem nenhuma letra e com menos de dois dígitos.
pub fn is_invalid_date(text: &str) -> bool {
    !LETTER.is_match(text) && DIGIT.find_iter(text).take(2).count() < 2
}

/// O último token da menção tem POS de substantivo (`NN*`).
pub fn headed_by_noun(mention: &Mention, tokens: &[Token]) -> bool {
    mention
        .end
        .checked_sub(1)
        .and_then(|last| tokens.get(last))
        .map(|t| t.pos.starts_with("NN"))
        .unwrap_or(false)
}
