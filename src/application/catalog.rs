// Static catalogs bundled into the curation payload
use crate::domain::curation::{ApiSurface, FinancialSnapshot, KnowledgeArticle, TrainingPlan};

pub fn knowledge_base() -> Vec<KnowledgeArticle> {
    vec![
        KnowledgeArticle {
            id: "kb-battery",
            title: "Battery care and charging schedules",
            category: "Maintenance",
            summary: "Dock robots below 20% between shifts and rotate chargers weekly to keep cell wear even.",
            updated: "2026-09-02",
        },
        KnowledgeArticle {
            id: "kb-lidar",
            title: "Clearing LiDAR obstruction faults",
            category: "Troubleshooting",
            summary: "Wipe the sensor window with a dry cloth, then run a recalibration from the robot detail page.",
            updated: "2026-08-19",
        },
        KnowledgeArticle {
            id: "kb-mapping",
            title: "Remapping a floor after a layout change",
            category: "Deployment",
            summary: "Walk the robot through the new layout in teach mode and re-publish waypoints before service.",
            updated: "2026-07-30",
        },
        KnowledgeArticle {
            id: "kb-healthcare",
            title: "Healthcare delivery compliance checklist",
            category: "Compliance",
            summary: "Locked drawers, chain-of-custody logging and infection-control wipe-downs for medication runs.",
            updated: "2026-09-21",
        },
        KnowledgeArticle {
            id: "kb-peak",
            title: "Staffing robots for peak shifts",
            category: "Operations",
            summary: "Use the shift heatmap to move Carti units to lunch and dinner where demand scores exceed 0.85.",
            updated: "2026-10-01",
        },
    ]
}

pub fn financial_snapshot() -> FinancialSnapshot {
    FinancialSnapshot {
        period: "Trailing 90 days".to_string(),
        revenue_usd: 1_284_500.0,
        operating_cost_usd: 412_300.0,
        labor_savings_usd: 538_900.0,
        cost_per_order_usd: 0.42,
        roi_pct: 211.5,
        payback_months: 7.8,
    }
}

pub fn api_surfaces() -> Vec<ApiSurface> {
    vec![
        ApiSurface {
            name: "Curation",
            method: "GET",
            path: "/api/curation",
            description: "KPIs, trends, heatmap, alerts and static snapshots in one payload",
            status: "stable",
        },
        ApiSurface {
            name: "Fleet",
            method: "GET",
            path: "/api/robots",
            description: "Robot list with status, facility and model filters",
            status: "stable",
        },
        ApiSurface {
            name: "Robot actions",
            method: "POST",
            path: "/api/robots/:id/actions",
            description: "Simulated restart, recalibration, error clearing and docking",
            status: "beta",
        },
        ApiSurface {
            name: "Live feed",
            method: "GET",
            path: "/api/live/stream",
            description: "Newline-delimited JSON stream of simulated shift samples",
            status: "beta",
        },
        ApiSurface {
            name: "Assistant",
            method: "POST",
            path: "/api/chat",
            description: "Fleet assistant with tool calls for navigation and robot actions",
            status: "preview",
        },
    ]
}

pub fn training_plans() -> Vec<TrainingPlan> {
    vec![
        TrainingPlan {
            id: "tp-nav-v4",
            model_name: "NavNet v4",
            objective: "Reduce path replans in crowded dining rooms",
            dataset: "Dining floor traces, 1.2M frames",
            epochs: 40,
            target_accuracy: 0.962,
            status: "training",
            owner: "Autonomy",
        },
        TrainingPlan {
            id: "tp-obstacle-v2",
            model_name: "ObstacleSeg v2",
            objective: "Detect low obstacles such as bags and chair legs",
            dataset: "Annotated depth captures, 340k frames",
            epochs: 60,
            target_accuracy: 0.94,
            status: "queued",
            owner: "Perception",
        },
        TrainingPlan {
            id: "tp-demand-v1",
            model_name: "ShiftDemand v1",
            objective: "Forecast orders per facility and shift one week ahead",
            dataset: "Operations history, 16 weeks",
            epochs: 25,
            target_accuracy: 0.88,
            status: "evaluating",
            owner: "Data Science",
        },
    ]
}
