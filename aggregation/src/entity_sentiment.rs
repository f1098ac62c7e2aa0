use std::collections::{HashMap, HashSet};

use inference::LabelDistribution;

use crate::{AggregationError, Result};

/// Average each entity's scores across one batch.
///
/// `entities[i]` is the set of entity names extracted from the record
/// whose classifier output is `scores[i]`. An entity mentioned in k > 0
/// records contributes k observations; an entity mentioned nowhere
/// never gets a key. The per-entity result is the component-wise mean
/// of its observations, not re-normalized.
pub fn merge_entity_scores(
    entities: &[HashSet<String>],
    scores: &[LabelDistribution],
) -> Result<HashMap<String, LabelDistribution>> {
    if entities.len() != scores.len() {
        return Err(AggregationError::LengthMismatch {
            entities: entities.len(),
            scores: scores.len(),
        });
    }

    // Union of every record's entity set, then an explicit empty
    // accumulator per member.
    let mut batch_entities: HashSet<&String> = HashSet::new();
    for record_entities in entities {
        batch_entities.extend(record_entities);
    }

    let mut accumulated: HashMap<String, Vec<LabelDistribution>> = batch_entities
        .into_iter()
        .map(|entity| (entity.clone(), Vec::new()))
        .collect();

    for (record_entities, score) in entities.iter().zip(scores) {
        for entity in record_entities {
            if let Some(observations) = accumulated.get_mut(entity) {
                observations.push(*score);
            }
        }
    }

    Ok(accumulated
        .into_iter()
        .filter(|(_, observations)| !observations.is_empty())
        .map(|(entity, observations)| (entity, LabelDistribution::mean(&observations)))
        .collect())
}
