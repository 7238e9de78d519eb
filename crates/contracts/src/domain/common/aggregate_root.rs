use super::EntityMetadata;

/// Трейт для корня агрегата
///
/// Определяет обязательные методы и метаданные для всех агрегатов системы
pub trait AggregateRoot {
    /// Тип идентификатора агрегата
    type Id;

    /// Получить ID записи
    fn id(&self) -> Self::Id;

    /// Получить метаданные жизненного цикла
    fn metadata(&self) -> &EntityMetadata;

    /// Получить изменяемые метаданные
    fn metadata_mut(&mut self) -> &mut EntityMetadata;

    /// Индекс агрегата в системе (например, "a001")
    fn aggregate_index() -> &'static str;

    /// Имя коллекции для БД (например, "document")
    fn collection_name() -> &'static str;

    /// Имя элемента для UI
    fn element_name() -> &'static str;

    /// Имя списка для UI
    fn list_name() -> &'static str;

    /// Полное имя агрегата для системы (например, "a001_document")
    fn full_name() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::collection_name())
    }

    /// Хук перед записью: обновить timestamp и версию
    fn before_write(&mut self) {
        let metadata = self.metadata_mut();
        metadata.touch();
        metadata.increment_version();
    }
}
