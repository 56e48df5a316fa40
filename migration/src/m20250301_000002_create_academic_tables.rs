use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn id_column<T: IntoIden>(iden: T) -> ColumnDef {
    ColumnDef::new(iden)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn reference_column<T: IntoIden>(iden: T) -> ColumnDef {
    ColumnDef::new(iden).big_integer().not_null().to_owned()
}

fn active_column<T: IntoIden>(iden: T) -> ColumnDef {
    ColumnDef::new(iden)
        .boolean()
        .not_null()
        .default(true)
        .to_owned()
}

fn timestamp_column<T: IntoIden>(iden: T) -> ColumnDef {
    ColumnDef::new(iden).big_integer().not_null().to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 学期 ====================
        manager
            .create_table(
                Table::create()
                    .table(AcademicPeriods::Table)
                    .if_not_exists()
                    .col(id_column(AcademicPeriods::Id))
                    .col(reference_column(AcademicPeriods::SchoolId))
                    .col(ColumnDef::new(AcademicPeriods::Name).string().not_null())
                    .col(
                        ColumnDef::new(AcademicPeriods::AcademicYear)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AcademicPeriods::PeriodType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AcademicPeriods::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AcademicPeriods::StartDate)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(AcademicPeriods::EndDate).big_integer().null())
                    .col(active_column(AcademicPeriods::Active))
                    .col(timestamp_column(AcademicPeriods::CreatedAt))
                    .col(timestamp_column(AcademicPeriods::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(AcademicPeriods::Table, AcademicPeriods::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 班级 ====================
        manager
            .create_table(
                Table::create()
                    .table(Classrooms::Table)
                    .if_not_exists()
                    .col(id_column(Classrooms::Id))
                    .col(reference_column(Classrooms::SchoolId))
                    .col(ColumnDef::new(Classrooms::Name).string().not_null())
                    .col(ColumnDef::new(Classrooms::GradeLevel).string().not_null())
                    .col(ColumnDef::new(Classrooms::Section).string().not_null())
                    .col(ColumnDef::new(Classrooms::AcademicYear).integer().not_null())
                    .col(active_column(Classrooms::Active))
                    .col(timestamp_column(Classrooms::CreatedAt))
                    .col(timestamp_column(Classrooms::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Classrooms::Table, Classrooms::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 课程与能力 ====================
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(id_column(Courses::Id))
                    .col(reference_column(Courses::SchoolId))
                    .col(ColumnDef::new(Courses::Name).string().not_null())
                    .col(ColumnDef::new(Courses::Code).string().null())
                    .col(ColumnDef::new(Courses::Description).text().null())
                    .col(active_column(Courses::Active))
                    .col(timestamp_column(Courses::CreatedAt))
                    .col(timestamp_column(Courses::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Competencies::Table)
                    .if_not_exists()
                    .col(id_column(Competencies::Id))
                    .col(reference_column(Competencies::CourseId))
                    .col(ColumnDef::new(Competencies::Name).string().not_null())
                    .col(ColumnDef::new(Competencies::Description).text().null())
                    .col(
                        ColumnDef::new(Competencies::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(active_column(Competencies::Active))
                    .col(timestamp_column(Competencies::CreatedAt))
                    .col(timestamp_column(Competencies::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Competencies::Table, Competencies::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 教师分配 ====================
        manager
            .create_table(
                Table::create()
                    .table(TeacherAssignments::Table)
                    .if_not_exists()
                    .col(id_column(TeacherAssignments::Id))
                    .col(reference_column(TeacherAssignments::TeacherId))
                    .col(reference_column(TeacherAssignments::CourseId))
                    .col(reference_column(TeacherAssignments::ClassroomId))
                    .col(active_column(TeacherAssignments::Active))
                    .col(timestamp_column(TeacherAssignments::CreatedAt))
                    .col(timestamp_column(TeacherAssignments::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeacherAssignments::Table, TeacherAssignments::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeacherAssignments::Table, TeacherAssignments::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeacherAssignments::Table, TeacherAssignments::ClassroomId)
                            .to(Classrooms::Table, Classrooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 学生 ====================
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(id_column(Students::Id))
                    .col(reference_column(Students::SchoolId))
                    .col(ColumnDef::new(Students::FirstName).string().not_null())
                    .col(ColumnDef::new(Students::LastName).string().not_null())
                    .col(ColumnDef::new(Students::DocumentNumber).string().null())
                    .col(ColumnDef::new(Students::BirthDate).big_integer().null())
                    .col(active_column(Students::Active))
                    .col(timestamp_column(Students::CreatedAt))
                    .col(timestamp_column(Students::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(id_column(Enrollments::Id))
                    .col(reference_column(Enrollments::StudentId))
                    .col(reference_column(Enrollments::ClassroomId))
                    .col(timestamp_column(Enrollments::EnrolledAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::ClassroomId)
                            .to(Classrooms::Table, Classrooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StudentGuardians::Table)
                    .if_not_exists()
                    .col(id_column(StudentGuardians::Id))
                    .col(reference_column(StudentGuardians::StudentId))
                    .col(reference_column(StudentGuardians::GuardianId))
                    .col(ColumnDef::new(StudentGuardians::Relationship).string().null())
                    .col(timestamp_column(StudentGuardians::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentGuardians::Table, StudentGuardians::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentGuardians::Table, StudentGuardians::GuardianId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 评价 ====================
        manager
            .create_table(
                Table::create()
                    .table(Evaluations::Table)
                    .if_not_exists()
                    .col(id_column(Evaluations::Id))
                    .col(reference_column(Evaluations::TeacherAssignmentId))
                    .col(reference_column(Evaluations::AcademicPeriodId))
                    .col(reference_column(Evaluations::CompetencyId))
                    .col(reference_column(Evaluations::StudentId))
                    .col(ColumnDef::new(Evaluations::Grade).string().not_null())
                    .col(ColumnDef::new(Evaluations::Comment).text().null())
                    .col(reference_column(Evaluations::CreatedBy))
                    .col(timestamp_column(Evaluations::CreatedAt))
                    .col(timestamp_column(Evaluations::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Evaluations::Table, Evaluations::TeacherAssignmentId)
                            .to(TeacherAssignments::Table, TeacherAssignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Evaluations::Table, Evaluations::AcademicPeriodId)
                            .to(AcademicPeriods::Table, AcademicPeriods::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Evaluations::Table, Evaluations::CompetencyId)
                            .to(Competencies::Table, Competencies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Evaluations::Table, Evaluations::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Evaluations::Table, Evaluations::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 索引 ====================
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_teacher_assignments_unique")
                    .table(TeacherAssignments::Table)
                    .col(TeacherAssignments::TeacherId)
                    .col(TeacherAssignments::CourseId)
                    .col(TeacherAssignments::ClassroomId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_enrollments_unique")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .col(Enrollments::ClassroomId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_student_guardians_unique")
                    .table(StudentGuardians::Table)
                    .col(StudentGuardians::StudentId)
                    .col(StudentGuardians::GuardianId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_evaluations_context")
                    .table(Evaluations::Table)
                    .col(Evaluations::TeacherAssignmentId)
                    .col(Evaluations::AcademicPeriodId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_evaluations_student")
                    .table(Evaluations::Table)
                    .col(Evaluations::StudentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(Evaluations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudentGuardians::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeacherAssignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Competencies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Classrooms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AcademicPeriods::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Schools {
    #[sea_orm(iden = "schools")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum AcademicPeriods {
    #[sea_orm(iden = "academic_periods")]
    Table,
    Id,
    SchoolId,
    Name,
    AcademicYear,
    PeriodType,
    DisplayOrder,
    StartDate,
    EndDate,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Classrooms {
    #[sea_orm(iden = "classrooms")]
    Table,
    Id,
    SchoolId,
    Name,
    GradeLevel,
    Section,
    AcademicYear,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Courses {
    #[sea_orm(iden = "courses")]
    Table,
    Id,
    SchoolId,
    Name,
    Code,
    Description,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Competencies {
    #[sea_orm(iden = "competencies")]
    Table,
    Id,
    CourseId,
    Name,
    Description,
    DisplayOrder,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TeacherAssignments {
    #[sea_orm(iden = "teacher_assignments")]
    Table,
    Id,
    TeacherId,
    CourseId,
    ClassroomId,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    SchoolId,
    FirstName,
    LastName,
    DocumentNumber,
    BirthDate,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Enrollments {
    #[sea_orm(iden = "enrollments")]
    Table,
    Id,
    StudentId,
    ClassroomId,
    EnrolledAt,
}

#[derive(DeriveIden)]
enum StudentGuardians {
    #[sea_orm(iden = "student_guardians")]
    Table,
    Id,
    StudentId,
    GuardianId,
    Relationship,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Evaluations {
    #[sea_orm(iden = "evaluations")]
    Table,
    Id,
    TeacherAssignmentId,
    AcademicPeriodId,
    CompetencyId,
    StudentId,
    Grade,
    Comment,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
