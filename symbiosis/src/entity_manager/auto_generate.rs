use crate::entity_metadata::EntityRef;
use crate::types::{Event, Record, SymbiosisError, SymbiosisResult};

use super::EntityManager;

impl EntityManager {
    /// Fill the auto generated columns that `data` leaves out.
    ///
    /// Only columns generated entity-to-database whose event set includes `event`
    /// are considered. A key that is present, even with a `null` value, is never
    /// overwritten. Generated values are stored under the logical name.
    pub fn auto_generate_entity_to_database(
        &self,
        entity: EntityRef,
        data: &Record,
        event: Event,
    ) -> SymbiosisResult<Record> {
        let metadata = self.get_entity_metadata(entity)?;
        let mut output = data.clone();

        for column in metadata.columns.iter().filter(|column| column.generates_on(event)) {
            if output.contains_key(&column.name) {
                continue;
            }
            let strategy = column.auto_generate.as_deref().unwrap_or_default();
            let generator = self.generators().get(strategy).ok_or_else(|| {
                SymbiosisError::unknown_generation_strategy(entity.name(), &column.name, strategy)
            })?;

            log::trace!(
                target: "symbiosis",
                "generating {}.{} with strategy {} on {}",
                metadata.class_name,
                column.name,
                strategy,
                event.as_str()
            );
            output.insert(column.name.clone(), generator.generate());
        }

        Ok(output)
    }
}
