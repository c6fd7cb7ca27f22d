//! Built-in module catalog shown on the dashboard and in the Learn menu.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

#[derive(Debug)]
pub struct Lesson {
    pub id: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub minutes: u32,
    pub starter_code: &'static str,
    pub hints: &'static [&'static str],
}

#[derive(Debug)]
pub struct Module {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub difficulty: Difficulty,
    pub icon: &'static str,
    pub lessons: &'static [Lesson],
}

impl Module {
    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }

    pub fn total_minutes(&self) -> u32 {
        self.lessons.iter().map(|l| l.minutes).sum()
    }
}

pub static MODULES: &[Module] = &[
    Module {
        id: "basics",
        title: "PowerShell Basics",
        description: "Learn the fundamentals of PowerShell scripting",
        category: "Foundation",
        difficulty: Difficulty::Beginner,
        icon: "📚",
        lessons: &[
            Lesson {
                id: "basics-1",
                title: "Introduction to PowerShell",
                summary: "Understanding what PowerShell is and why it's powerful",
                minutes: 15,
                starter_code: "Get-Process",
                hints: &["Cmdlets follow a Verb-Noun naming pattern"],
            },
            Lesson {
                id: "basics-2",
                title: "Variables and Data Types",
                summary: "Working with variables, strings, numbers, and arrays",
                minutes: 20,
                starter_code: "$name = \"Alice\"\n$items = @(1, 2, 3)",
                hints: &[
                    "Variables start with $",
                    "Cast explicitly with [int] or [string]",
                ],
            },
            Lesson {
                id: "basics-3",
                title: "Basic Cmdlets",
                summary: "Essential PowerShell commands you need to know",
                minutes: 25,
                starter_code: "Get-ChildItem | Where-Object { $_.Length -gt 1kb }",
                hints: &["Get-Help <cmdlet> shows usage", "Get-Command lists cmdlets"],
            },
        ],
    },
    Module {
        id: "active-directory",
        title: "Active Directory Management",
        description: "Master AD administration with PowerShell",
        category: "On-Premise",
        difficulty: Difficulty::Intermediate,
        icon: "🏢",
        lessons: &[
            Lesson {
                id: "ad-1",
                title: "AD Module Overview",
                summary: "Introduction to the Active Directory PowerShell module",
                minutes: 20,
                starter_code: "Import-Module ActiveDirectory",
                hints: &["RSAT must be installed for the AD module"],
            },
            Lesson {
                id: "ad-2",
                title: "User Management",
                summary: "Creating, modifying, and managing AD users",
                minutes: 30,
                starter_code: "Get-ADUser -Filter * -Properties LastLogonDate",
                hints: &["-Filter takes a PowerShell-style expression"],
            },
            Lesson {
                id: "ad-3",
                title: "Group Management",
                summary: "Working with AD groups and memberships",
                minutes: 25,
                starter_code: "Get-ADGroupMember -Identity 'Domain Admins'",
                hints: &["Add-ADGroupMember accepts arrays of members"],
            },
        ],
    },
    Module {
        id: "msgraph",
        title: "Microsoft Graph PowerShell",
        description: "Modern cloud management with MS Graph",
        category: "Cloud",
        difficulty: Difficulty::Advanced,
        icon: "☁",
        lessons: &[
            Lesson {
                id: "graph-1",
                title: "Graph API Fundamentals",
                summary: "Understanding Microsoft Graph and authentication",
                minutes: 30,
                starter_code: "Connect-MgGraph -Scopes 'User.Read.All'",
                hints: &["Scopes decide what the session may read or write"],
            },
            Lesson {
                id: "graph-2",
                title: "User and Group Management",
                summary: "Managing Azure AD/Entra ID resources",
                minutes: 35,
                starter_code: "Get-MgUser -Top 10",
                hints: &["-All pages through every result"],
            },
        ],
    },
    Module {
        id: "scripting",
        title: "Advanced Scripting",
        description: "Build robust PowerShell scripts and tools",
        category: "Advanced",
        difficulty: Difficulty::Advanced,
        icon: "🚀",
        lessons: &[
            Lesson {
                id: "script-1",
                title: "Functions and Modules",
                summary: "Creating reusable PowerShell code",
                minutes: 40,
                starter_code: "function Get-Greeting {\n    param([string]$Name)\n    \"Hello, $Name\"\n}",
                hints: &["[CmdletBinding()] turns a function into an advanced function"],
            },
            Lesson {
                id: "script-2",
                title: "Error Handling",
                summary: "Implementing robust error handling",
                minutes: 30,
                starter_code: "try { Get-Item missing.txt -ErrorAction Stop } catch { $_ }",
                hints: &["Only terminating errors reach catch; use -ErrorAction Stop"],
            },
        ],
    },
    Module {
        id: "automation",
        title: "Automation & DevOps",
        description: "Automate everything with PowerShell",
        category: "DevOps",
        difficulty: Difficulty::Intermediate,
        icon: "⚙",
        lessons: &[
            Lesson {
                id: "auto-1",
                title: "Scheduled Tasks",
                summary: "Automating scripts with Task Scheduler",
                minutes: 25,
                starter_code: "Register-ScheduledTask -TaskName Nightly -Action $action -Trigger $trigger",
                hints: &["New-ScheduledTaskTrigger -Daily -At 3am"],
            },
            Lesson {
                id: "auto-2",
                title: "CI/CD Pipelines",
                summary: "PowerShell in modern DevOps workflows",
                minutes: 35,
                starter_code: "Invoke-Pester -Path ./tests -CI",
                hints: &["Pester is the standard PowerShell test framework"],
            },
        ],
    },
];

pub fn find_module(id: &str) -> Option<&'static Module> {
    MODULES.iter().find(|m| m.id == id)
}

pub fn module_index(id: &str) -> Option<usize> {
    MODULES.iter().position(|m| m.id == id)
}
