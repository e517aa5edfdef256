//! Seed catalogue: three courses and their ordered lessons.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CourseRecord {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub overview: String,
    pub difficulty_level: String,
    pub estimated_duration: String,
    pub image_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LessonRecord {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub description: String,
    pub lesson_number: u32,
    pub estimated_duration: String,
    pub learning_objectives: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub courses: Vec<CourseRecord>,
    pub lessons: Vec<LessonRecord>,
}

impl Catalog {
    pub fn course(&self, id: i64) -> Option<&CourseRecord> {
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn lesson(&self, id: i64) -> Option<&LessonRecord> {
        self.lessons.iter().find(|l| l.id == id)
    }

    /// Lessons of a course ordered by `lesson_number`.
    pub fn lessons_of(&self, course_id: i64) -> Vec<&LessonRecord> {
        let mut lessons: Vec<_> = self
            .lessons
            .iter()
            .filter(|l| l.course_id == course_id)
            .collect();
        lessons.sort_by_key(|l| l.lesson_number);
        lessons
    }

    /// Append a course; lesson ids continue from the highest one in use.
    pub fn add_course(&mut self, course: CourseRecord, lessons: &[(&str, &str, &str, &[&str])]) {
        let mut next_id = self.lessons.iter().map(|l| l.id).max().unwrap_or(0);
        for (index, (title, description, duration, objectives)) in lessons.iter().enumerate() {
            next_id += 1;
            self.lessons.push(LessonRecord {
                id: next_id,
                course_id: course.id,
                title: title.to_string(),
                description: description.to_string(),
                lesson_number: index as u32 + 1,
                estimated_duration: duration.to_string(),
                learning_objectives: objectives.iter().map(|o| o.to_string()).collect(),
            });
        }
        self.courses.push(course);
    }

    pub fn seeded() -> Self {
        let mut catalog = Catalog::default();
        catalog.add_course(
            course(
                1,
                "Python for Data Analysis",
                "Learn to analyze data using Python's powerful libraries including Pandas, NumPy, and Matplotlib.",
                "Master the fundamentals of data analysis with Python, from basic Python concepts to advanced data manipulation and visualization techniques.",
                "Beginner to Intermediate",
                "6-8 weeks",
                "/images/python-data-analysis.jpg",
            ),
            &[
                (
                    "Introduction to Python and Data Types",
                    "Learn Python basics and fundamental data types for data analysis",
                    "45 minutes",
                    &[
                        "Understand Python syntax and data types",
                        "Work with lists, dictionaries, and tuples",
                        "Handle strings and numeric data",
                        "Set up Python environment for data analysis",
                    ],
                ),
                (
                    "Introduction to NumPy",
                    "Master NumPy arrays and mathematical operations",
                    "60 minutes",
                    &[
                        "Create and manipulate NumPy arrays",
                        "Perform mathematical operations on arrays",
                        "Understand array indexing and slicing",
                        "Work with multi-dimensional arrays",
                    ],
                ),
                (
                    "Getting Started with Pandas",
                    "Learn DataFrame operations and data manipulation",
                    "90 minutes",
                    &[
                        "Create and work with DataFrames",
                        "Load data from various file formats",
                        "Perform basic data exploration",
                        "Handle missing data",
                    ],
                ),
                (
                    "Data Cleaning and Preprocessing",
                    "Clean messy data and prepare it for analysis",
                    "75 minutes",
                    &[
                        "Identify and handle missing values",
                        "Remove duplicates and outliers",
                        "Transform and normalize data",
                        "Merge and join datasets",
                    ],
                ),
                (
                    "Data Visualization with Matplotlib",
                    "Create compelling visualizations to communicate insights",
                    "60 minutes",
                    &[
                        "Create basic plots (line, bar, scatter)",
                        "Customize plot appearance",
                        "Create subplots and complex layouts",
                        "Export and save visualizations",
                    ],
                ),
            ],
        );
        catalog.add_course(
            course(
                2,
                "SQL Fundamentals",
                "Master database queries, joins, and advanced SQL techniques for data retrieval and analysis.",
                "Become proficient in SQL, the universal language of databases, from basic queries to complex database operations.",
                "Beginner to Advanced",
                "4-6 weeks",
                "/images/sql-fundamentals.jpg",
            ),
            &[
                (
                    "Database Fundamentals and SELECT Statements",
                    "Understanding databases and basic query structure",
                    "50 minutes",
                    &[
                        "Understand relational database concepts",
                        "Write basic SELECT statements",
                        "Use WHERE clauses for filtering",
                        "Sort results with ORDER BY",
                    ],
                ),
                (
                    "Working with Multiple Tables - JOINs",
                    "Learn different types of joins to combine data",
                    "70 minutes",
                    &[
                        "Understand table relationships",
                        "Master INNER, LEFT, RIGHT, and FULL JOINs",
                        "Use table aliases effectively",
                        "Handle complex multi-table queries",
                    ],
                ),
                (
                    "Aggregate Functions and Grouping",
                    "Summarize data using aggregate functions",
                    "60 minutes",
                    &[
                        "Use COUNT, SUM, AVG, MIN, MAX functions",
                        "Group data with GROUP BY",
                        "Filter groups with HAVING",
                        "Create summary reports",
                    ],
                ),
                (
                    "Subqueries and Advanced Techniques",
                    "Write complex queries with subqueries and CTEs",
                    "80 minutes",
                    &[
                        "Write correlated and non-correlated subqueries",
                        "Use Common Table Expressions (CTEs)",
                        "Understand window functions",
                        "Optimize query performance",
                    ],
                ),
            ],
        );
        catalog.add_course(
            course(
                3,
                "Excel Mastery",
                "Advanced Excel techniques including formulas, pivot tables, macros, and data analysis tools.",
                "Transform your Excel skills from basic to expert level with the techniques used by financial analysts and data professionals.",
                "Intermediate to Advanced",
                "5-7 weeks",
                "/images/excel-mastery.jpg",
            ),
            &[
                (
                    "Advanced Formulas and Functions",
                    "Master complex Excel formulas for data analysis",
                    "65 minutes",
                    &[
                        "Use VLOOKUP, HLOOKUP, and INDEX-MATCH",
                        "Master conditional functions (IF, COUNTIF, SUMIF)",
                        "Work with text functions",
                        "Handle date and time calculations",
                    ],
                ),
                (
                    "Dynamic Pivot Tables and Charts",
                    "Create interactive reports with pivot tables",
                    "75 minutes",
                    &[
                        "Build comprehensive pivot tables",
                        "Create calculated fields and items",
                        "Design pivot charts",
                        "Use slicers and timelines for interactivity",
                    ],
                ),
                (
                    "Data Analysis Tools and Add-ins",
                    "Leverage Excel's built-in analysis features",
                    "55 minutes",
                    &[
                        "Use Data Analysis ToolPak",
                        "Perform statistical analysis",
                        "Create data models with Power Query",
                        "Build forecasting models",
                    ],
                ),
                (
                    "Automation with Macros and VBA",
                    "Automate repetitive tasks with Visual Basic",
                    "90 minutes",
                    &[
                        "Record and edit macros",
                        "Write basic VBA code",
                        "Create user forms and controls",
                        "Automate data processing workflows",
                    ],
                ),
            ],
        );
        catalog
    }
}

fn course(
    id: i64,
    title: &str,
    description: &str,
    overview: &str,
    difficulty_level: &str,
    estimated_duration: &str,
    image_url: &str,
) -> CourseRecord {
    CourseRecord {
        id,
        title: title.to_string(),
        description: description.to_string(),
        overview: overview.to_string(),
        difficulty_level: difficulty_level.to_string(),
        estimated_duration: estimated_duration.to_string(),
        image_url: image_url.to_string(),
    }
}
