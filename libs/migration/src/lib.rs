pub use sea_orm_migration::prelude::*;

mod m20241129_000000_create_users;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20241129_000000_create_users::Migration)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_users_migration_registered() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        assert_eq!(names, vec!["m20241129_000000_create_users"]);
    }
}
