/// A worked example shown to the model before the live document.
pub struct FewShotExample {
    pub input_tags: &'static [&'static str],
    pub document: &'static str,
    pub tags: &'static [&'static str],
    pub new_tags: &'static [&'static str],
}

pub static EXAMPLES: &[FewShotExample] = &[
    FewShotExample {
        input_tags: &[
            "#redis",
            "#caching",
            "#security",
            "#docker",
            "#database",
            "#load-balancing",
            "#networking",
            "#database-backups",
        ],
        document: "How to Set Up a Secure Redis Cache in Production

This guide walks through setting up Redis as a caching solution in a production environment, with a focus on security best practices. We'll cover:

1. Installing and configuring Redis with encryption
2. Setting up authentication
3. Implementing connection pooling
4. Configuring backup strategies
5. Monitoring cache performance

We'll use Docker for deployment and demonstrate integration with Node.js applications.",
        tags: &["#redis", "#caching", "#security", "#docker"],
        new_tags: &["#production-deployment", "#infrastructure-monitoring"],
    },
    FewShotExample {
        input_tags: &[
            "#self-reflection",
            "#personal-growth",
            "#relationships",
            "#journaling",
            "#psychology",
            "#goal-setting",
        ],
        document: "April 15, 2024

Today I realized something important about my tendency to overthink decisions. While having coffee with Sarah, she mentioned how quickly I shut down the idea of applying for that art workshop. My immediate response was to list all the reasons why it wouldn't work - time, money, my supposed lack of talent.

But sitting here now, I recognize this pattern. It's the same one that kept me from trying photography last year. I'm not afraid of failing as much as I'm afraid of being seen trying. There's a vulnerability in beginning something new, in being a novice.

Question to reflect on: What would I do if I knew no one was watching or judging?",
        tags: &["#self-reflection", "#personal-growth", "#relationships"],
        new_tags: &["#fear-exploration", "#comfort-zone"],
    },
    FewShotExample {
        input_tags: &[
            "#microservices",
            "#devops",
            "#team-management",
            "#agile",
            "#software-testing",
            "#version-control",
            "#code-quality",
        ],
        document: "Impact of Microservices on Team Productivity

Our 6-month study across 12 development teams revealed that transitioning from monolithic to microservices architecture led to:

- 40% reduction in deployment failures
- 60% faster feature delivery
- Increased team autonomy
- Higher maintenance complexity
- Need for improved service discovery

However, teams smaller than 8 developers reported challenges with the increased operational overhead.",
        tags: &["#microservices", "#devops", "#team-management"],
        new_tags: &["#productivity-analysis", "#architecture-transition"],
    },
];
