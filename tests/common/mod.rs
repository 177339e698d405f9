#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use crudfilter::filtering::{FieldValue, Record};
use crudfilter::{DateTimeFilter, IntFilter, StringFilter};
use sea_orm::{Database, DatabaseConnection, DbErr, EntityTrait};
use sea_orm_migration::prelude::*;

pub mod chapter_entity;
pub mod course_entity;

pub use chapter_entity as chapter;
pub use course_entity as course;

crudfilter::filter_expression! {
    /// Filter over courses.
    pub struct CourseFilter {
        id: IntFilter,
        title: StringFilter,
        description: StringFilter,
        seats: IntFilter,
        published: bool,
        created_at: DateTimeFilter,
    }
}

crudfilter::filter_expression! {
    /// Filter over chapters.
    pub struct ChapterFilter {
        id: IntFilter,
        course_id: IntFilter,
        title: StringFilter,
        position: IntFilter,
    }
}

impl Record for course::Model {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(FieldValue::Int(i64::from(self.id))),
            "title" => Some(FieldValue::Str(&self.title)),
            "description" => Some(FieldValue::Str(&self.description)),
            "seats" => Some(FieldValue::Int(i64::from(self.seats))),
            "published" => Some(FieldValue::Bool(self.published)),
            "created_at" => Some(FieldValue::DateTime(self.created_at)),
            _ => None,
        }
    }
}

impl Record for chapter::Model {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(FieldValue::Int(i64::from(self.id))),
            "course_id" => Some(FieldValue::Int(i64::from(self.course_id))),
            "title" => Some(FieldValue::Str(&self.title)),
            "position" => Some(FieldValue::Int(i64::from(self.position))),
            _ => None,
        }
    }
}

pub fn day(month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, month, day, 0, 0, 0).unwrap()
}

pub fn sample_courses() -> Vec<course::Model> {
    vec![
        course::Model {
            id: 1,
            title: "Course 1".to_string(),
            description: "A".to_string(),
            seats: 10,
            published: true,
            created_at: day(1, 10),
        },
        course::Model {
            id: 2,
            title: "Course 2".to_string(),
            description: "B".to_string(),
            seats: 25,
            published: false,
            created_at: day(2, 10),
        },
        course::Model {
            id: 3,
            title: "New COURSE on Rust".to_string(),
            description: "Ownership and borrowing".to_string(),
            seats: 40,
            published: true,
            created_at: day(3, 10),
        },
        course::Model {
            id: 4,
            title: "Advanced Rust".to_string(),
            description: "Async, traits and 100% safe code".to_string(),
            seats: 15,
            published: true,
            created_at: day(4, 10),
        },
        course::Model {
            id: 5,
            title: "Databases".to_string(),
            description: "SQL_basics".to_string(),
            seats: 25,
            published: false,
            created_at: day(5, 10),
        },
    ]
}

pub fn sample_chapters() -> Vec<chapter::Model> {
    let mut chapters = Vec::new();
    for course_id in 1..=3 {
        for position in 1..=4 {
            chapters.push(chapter::Model {
                id: course_id * 10 + position,
                course_id,
                title: format!("Chapter {position}"),
                position,
            });
        }
    }
    chapters
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    init_tracing();
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;

    Ok(db)
}

pub async fn setup_seeded_db() -> Result<DatabaseConnection, DbErr> {
    let db = setup_test_db().await?;

    course::Entity::insert_many(
        sample_courses()
            .into_iter()
            .map(course::ActiveModel::from),
    )
    .exec(&db)
    .await?;
    chapter::Entity::insert_many(
        sample_chapters()
            .into_iter()
            .map(chapter::ActiveModel::from),
    )
    .exec(&db)
    .await?;

    Ok(db)
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateCourseTable), Box::new(CreateChapterTable)]
    }
}

pub struct CreateCourseTable;

impl MigrationName for CreateCourseTable {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_course_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateCourseTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(CourseTable)
            .if_not_exists()
            .col(
                ColumnDef::new(CourseColumn::Id)
                    .integer()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(CourseColumn::Title).string().not_null())
            .col(ColumnDef::new(CourseColumn::Description).text().not_null())
            .col(
                ColumnDef::new(CourseColumn::Seats)
                    .integer()
                    .not_null()
                    .default(0),
            )
            .col(
                ColumnDef::new(CourseColumn::Published)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(
                ColumnDef::new(CourseColumn::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CourseTable).to_owned())
            .await?;
        Ok(())
    }
}

pub struct CreateChapterTable;

impl MigrationName for CreateChapterTable {
    fn name(&self) -> &'static str {
        "m20240101_000002_create_chapter_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateChapterTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(ChapterTable)
            .if_not_exists()
            .col(
                ColumnDef::new(ChapterColumn::Id)
                    .integer()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(ChapterColumn::CourseId).integer().not_null())
            .col(ColumnDef::new(ChapterColumn::Title).string().not_null())
            .col(ColumnDef::new(ChapterColumn::Position).integer().not_null())
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChapterTable).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct CourseTable;

impl Iden for CourseTable {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "courses").unwrap();
    }
}

#[derive(Debug)]
pub enum CourseColumn {
    Id,
    Title,
    Description,
    Seats,
    Published,
    CreatedAt,
}

impl Iden for CourseColumn {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Id => "id",
                Self::Title => "title",
                Self::Description => "description",
                Self::Seats => "seats",
                Self::Published => "published",
                Self::CreatedAt => "created_at",
            }
        )
        .unwrap();
    }
}

#[derive(Debug)]
pub struct ChapterTable;

impl Iden for ChapterTable {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "chapters").unwrap();
    }
}

#[derive(Debug)]
pub enum ChapterColumn {
    Id,
    CourseId,
    Title,
    Position,
}

impl Iden for ChapterColumn {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Id => "id",
                Self::CourseId => "course_id",
                Self::Title => "title",
                Self::Position => "position",
            }
        )
        .unwrap();
    }
}

/// Ids of the models, in order.
pub fn ids<M: HasId>(models: &[M]) -> Vec<i32> {
    models.iter().map(HasId::id).collect()
}

pub trait HasId {
    fn id(&self) -> i32;
}

impl HasId for course::Model {
    fn id(&self) -> i32 {
        self.id
    }
}

impl HasId for chapter::Model {
    fn id(&self) -> i32 {
        self.id
    }
}

impl<T: HasId> HasId for &T {
    fn id(&self) -> i32 {
        (**self).id()
    }
}

/// Courses matching `filter` according to the SQL backend, ordered by id.
pub async fn sql_matches(
    db: &DatabaseConnection,
    filter: &CourseFilter,
) -> Result<Vec<i32>, DbErr> {
    use crudfilter::filtering::{SqlBackend, compile};
    use sea_orm::{ConnectionTrait, QueryOrder};

    let backend = SqlBackend::new(db.get_database_backend());
    let rows = compile(&backend, Some(filter))
        .apply(course::Entity::find())
        .order_by_asc(course::Column::Id)
        .all(db)
        .await?;
    Ok(ids(&rows))
}

/// Courses matching `filter` according to the in-memory backend, ordered by id.
pub fn memory_matches(filter: &CourseFilter) -> Vec<i32> {
    use crudfilter::filtering::{MemoryBackend, compile};

    let courses = sample_courses();
    let predicate = compile(&MemoryBackend::<course::Model>::new(), Some(filter));
    ids(&predicate.select(&courses))
}
